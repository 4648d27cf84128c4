use cinevibe_core::ProviderConfig;
use cinevibe_ingestion::{
    build_http_client, EnrichmentOrchestrator, OmdbClient, TMDbClient, TraktClient,
};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Providers {
    tmdb: MockServer,
    omdb: MockServer,
    trakt: MockServer,
}

impl Providers {
    async fn start() -> Self {
        Self {
            tmdb: MockServer::start().await,
            omdb: MockServer::start().await,
            trakt: MockServer::start().await,
        }
    }

    fn orchestrator(&self) -> EnrichmentOrchestrator {
        let mut config = ProviderConfig::with_credentials("tmdb-key", "omdb-key", "trakt-id");
        config.tmdb_base_url = self.tmdb.uri();
        config.omdb_base_url = self.omdb.uri();
        config.trakt_base_url = self.trakt.uri();

        let http = build_http_client(Duration::from_secs(5)).unwrap();
        EnrichmentOrchestrator::new(
            TMDbClient::new(http.clone(), &config),
            OmdbClient::new(http.clone(), &config),
            TraktClient::new(http, &config),
        )
    }
}

fn inception_details(imdb_id: Option<&str>) -> serde_json::Value {
    json!({
        "id": 27205,
        "title": "Inception",
        "imdb_id": imdb_id,
        "tagline": "Your mind is the scene of the crime.",
        "release_date": "2010-07-15",
        "runtime": 148,
        "genres": [{ "id": 28, "name": "Action" }, { "id": 878, "name": "Science Fiction" }],
        "production_companies": [{ "id": 923, "name": "Legendary Pictures" }],
        "overview": "Cobb, a skilled thief...",
        "budget": 160000000,
        "revenue": 825532764,
        "vote_average": 8.4,
        "vote_count": 36000,
        "popularity": 90.5,
        "poster_path": "/inception.jpg"
    })
}

fn inception_omdb() -> serde_json::Value {
    json!({
        "Title": "Inception",
        "Year": "2010",
        "Rated": "PG-13",
        "Runtime": "148 min",
        "Genre": "Action, Adventure, Sci-Fi",
        "Plot": "A thief who steals corporate secrets through dream-sharing technology...",
        "Awards": "Won 4 Oscars. 159 wins & 220 nominations total",
        "Ratings": [
            { "Source": "Rotten Tomatoes", "Value": "87%" },
            { "Source": "Metacritic", "Value": "74/100" }
        ],
        "Metascore": "74",
        "imdbRating": "8.8",
        "imdbID": "tt1375666",
        "Response": "True"
    })
}

async fn mount_details(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/movie/27205"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_credits(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/movie/27205/credits"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "cast": [{ "name": "Leonardo DiCaprio", "character": "Cobb" }],
            "crew": [{ "name": "Christopher Nolan", "job": "Director" }]
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_enrichment() {
    let providers = Providers::start().await;
    mount_details(&providers.tmdb, inception_details(Some("tt1375666"))).await;
    mount_credits(&providers.tmdb).await;

    Mock::given(method("GET"))
        .and(query_param("i", "tt1375666"))
        .respond_with(ResponseTemplate::new(200).set_body_json(inception_omdb()))
        .expect(1)
        .mount(&providers.omdb)
        .await;

    let title = providers
        .orchestrator()
        .get_enriched(27205, false)
        .await
        .unwrap();

    assert_eq!(title.name, "Inception");
    assert_eq!(title.ratings.canonical, Some(8.4));
    assert_eq!(title.ratings.audience, Some(8.8));
    assert_eq!(title.ratings.critic_percentage, Some(87.0));
    assert_eq!(title.ratings.critic_weighted, Some(74.0));
    assert_eq!(title.cast[0].name, "Leonardo DiCaprio");
    assert_eq!(title.crew["Director"], vec!["Christopher Nolan"]);
    assert!(title.awards.as_deref().unwrap().contains("Oscars"));
    assert_eq!(title.rated.as_deref(), Some("PG-13"));
    assert!(title.community.is_none());
}

#[tokio::test]
async fn test_falls_back_to_title_and_year_on_not_found() {
    let providers = Providers::start().await;
    mount_details(&providers.tmdb, inception_details(Some("tt9999999"))).await;
    mount_credits(&providers.tmdb).await;

    Mock::given(method("GET"))
        .and(query_param("i", "tt9999999"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Response": "False",
            "Error": "Incorrect IMDb ID."
        })))
        .expect(1)
        .mount(&providers.omdb)
        .await;

    Mock::given(method("GET"))
        .and(query_param("t", "Inception"))
        .and(query_param("y", "2010"))
        .respond_with(ResponseTemplate::new(200).set_body_json(inception_omdb()))
        .expect(1)
        .mount(&providers.omdb)
        .await;

    let title = providers
        .orchestrator()
        .get_enriched(27205, false)
        .await
        .unwrap();

    assert_eq!(title.ratings.audience, Some(8.8));
}

#[tokio::test]
async fn test_falls_back_when_imdb_id_missing() {
    let providers = Providers::start().await;
    mount_details(&providers.tmdb, inception_details(None)).await;
    mount_credits(&providers.tmdb).await;

    Mock::given(method("GET"))
        .and(query_param("t", "Inception"))
        .respond_with(ResponseTemplate::new(200).set_body_json(inception_omdb()))
        .expect(1)
        .mount(&providers.omdb)
        .await;

    let title = providers
        .orchestrator()
        .get_enriched(27205, false)
        .await
        .unwrap();

    assert_eq!(title.external_id.as_deref(), Some("tt1375666"));
    assert_eq!(title.ratings.critic_percentage, Some(87.0));
}

#[tokio::test]
async fn test_malformed_imdb_id_skips_id_lookup() {
    let providers = Providers::start().await;
    mount_details(&providers.tmdb, inception_details(Some("1375666"))).await;
    mount_credits(&providers.tmdb).await;

    Mock::given(method("GET"))
        .and(query_param("i", "1375666"))
        .respond_with(ResponseTemplate::new(200).set_body_json(inception_omdb()))
        .expect(0)
        .mount(&providers.omdb)
        .await;

    Mock::given(method("GET"))
        .and(query_param("t", "Inception"))
        .and(query_param("y", "2010"))
        .respond_with(ResponseTemplate::new(200).set_body_json(inception_omdb()))
        .expect(1)
        .mount(&providers.omdb)
        .await;

    let title = providers
        .orchestrator()
        .get_enriched(27205, false)
        .await
        .unwrap();

    assert_eq!(title.ratings.audience, Some(8.8));
    assert_eq!(title.ratings.critic_percentage, Some(87.0));
}

#[tokio::test]
async fn test_no_fallback_after_transport_failure() {
    let providers = Providers::start().await;
    mount_details(&providers.tmdb, inception_details(Some("tt1375666"))).await;
    mount_credits(&providers.tmdb).await;

    Mock::given(method("GET"))
        .and(query_param("i", "tt1375666"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&providers.omdb)
        .await;

    Mock::given(method("GET"))
        .and(query_param("t", "Inception"))
        .respond_with(ResponseTemplate::new(200).set_body_json(inception_omdb()))
        .expect(0)
        .mount(&providers.omdb)
        .await;

    let title = providers
        .orchestrator()
        .get_enriched(27205, false)
        .await
        .unwrap();

    // Partial enrichment is still a success
    assert_eq!(title.ratings.canonical, Some(8.4));
    assert_eq!(title.ratings.audience, None);
    assert_eq!(title.ratings.critic_percentage, None);
    assert_eq!(title.awards, None);
}

#[tokio::test]
async fn test_credits_failure_is_tolerated() {
    let providers = Providers::start().await;
    mount_details(&providers.tmdb, inception_details(Some("tt1375666"))).await;

    Mock::given(method("GET"))
        .and(path("/movie/27205/credits"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&providers.tmdb)
        .await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(inception_omdb()))
        .mount(&providers.omdb)
        .await;

    let title = providers
        .orchestrator()
        .get_enriched(27205, false)
        .await
        .unwrap();

    assert!(title.cast.is_empty());
    assert!(title.crew.is_empty());
    assert_eq!(title.ratings.audience, Some(8.8));
}

#[tokio::test]
async fn test_primary_not_found_is_fatal() {
    let providers = Providers::start().await;

    Mock::given(method("GET"))
        .and(path("/movie/27205"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "success": false,
            "status_message": "The resource you requested could not be found."
        })))
        .mount(&providers.tmdb)
        .await;

    let err = providers
        .orchestrator()
        .get_enriched(27205, true)
        .await
        .unwrap_err();

    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_community_parts_fail_independently() {
    let providers = Providers::start().await;
    mount_details(&providers.tmdb, inception_details(Some("tt1375666"))).await;
    mount_credits(&providers.tmdb).await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(inception_omdb()))
        .mount(&providers.omdb)
        .await;

    Mock::given(method("GET"))
        .and(path("/search/tmdb/27205"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "type": "movie",
            "movie": { "title": "Inception", "year": 2010, "ids": { "slug": "inception-2010", "tmdb": 27205 } }
        }])))
        .mount(&providers.trakt)
        .await;

    Mock::given(method("GET"))
        .and(path("/movies/inception-2010/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "watchers": 1000, "plays": 2500, "collectors": 800,
            "comments": 120, "lists": 9000, "votes": 40000
        })))
        .mount(&providers.trakt)
        .await;

    Mock::given(method("GET"))
        .and(path("/movies/inception-2010/comments/likes"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&providers.trakt)
        .await;

    Mock::given(method("GET"))
        .and(path("/movies/inception-2010/related"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "title": "Interstellar", "year": 2014, "ids": { "tmdb": 157336 } }
        ])))
        .mount(&providers.trakt)
        .await;

    let title = providers
        .orchestrator()
        .get_enriched(27205, true)
        .await
        .unwrap();

    let community = title.community.expect("community data requested");
    assert_eq!(community.stats.map(|s| s.watchers), Some(1000));
    assert!(community.sentiment.is_none());
    assert_eq!(community.related.len(), 1);
    assert_eq!(community.related[0].title, "Interstellar");
}

#[tokio::test]
async fn test_community_without_slug_is_empty() {
    let providers = Providers::start().await;
    mount_details(&providers.tmdb, inception_details(None)).await;
    mount_credits(&providers.tmdb).await;

    Mock::given(method("GET"))
        .and(path("/search/tmdb/27205"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&providers.trakt)
        .await;

    let title = providers
        .orchestrator()
        .get_enriched(27205, true)
        .await
        .unwrap();

    let community = title.community.expect("community data requested");
    assert!(community.is_empty());
}
