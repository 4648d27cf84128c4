use cinevibe_core::ProviderConfig;
use cinevibe_ingestion::aggregator::{
    OmdbClient, TMDbClient, TraktClient, TraktList, TraktMovieListing, TraktTrendingKind,
};
use cinevibe_ingestion::{build_http_client, DiscoverQuery, ProviderClient, ProviderError};
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> ProviderConfig {
    let mut config = ProviderConfig::with_credentials("tmdb-key", "omdb-key", "trakt-id");
    config.tmdb_base_url = server.uri();
    config.omdb_base_url = server.uri();
    config.trakt_base_url = server.uri();
    config
}

fn http() -> reqwest::Client {
    build_http_client(Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_tmdb_search_attaches_api_key() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/movie"))
        .and(query_param("api_key", "tmdb-key"))
        .and(query_param("query", "Inception"))
        .and(query_param("year", "2010"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "page": 1,
            "results": [{
                "id": 27205,
                "title": "Inception",
                "release_date": "2010-07-15",
                "genre_ids": [28, 878],
                "vote_average": 8.4,
                "vote_count": 36000
            }],
            "total_results": 1
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = TMDbClient::new(http(), &config_for(&mock_server));
    let results = client.search_movies("Inception", Some(2010), 1).await.unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].provider_id, 27205);
    assert_eq!(results[0].genres, vec!["Action", "Science Fiction"]);
}

#[tokio::test]
async fn test_tmdb_explicit_miss_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/movie/999999999"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "success": false,
            "status_code": 34,
            "status_message": "The resource you requested could not be found."
        })))
        .mount(&mock_server)
        .await;

    let client = TMDbClient::new(http(), &config_for(&mock_server));
    let err = client.movie_details(999_999_999).await.unwrap_err();

    assert!(err.is_not_found(), "expected NotFound, got {:?}", err);
}

#[tokio::test]
async fn test_tmdb_bare_404_is_unreachable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/movie/1"))
        .respond_with(ResponseTemplate::new(404).set_body_string("<html>gone</html>"))
        .mount(&mock_server)
        .await;

    let client = TMDbClient::new(http(), &config_for(&mock_server));
    let err = client.movie_details(1).await.unwrap_err();

    assert!(matches!(err, ProviderError::Unreachable { provider: "tmdb", .. }));
}

#[tokio::test]
async fn test_tmdb_server_error_is_unreachable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/movie/27205"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let client = TMDbClient::new(http(), &config_for(&mock_server));
    let err = client.movie_details(27205).await.unwrap_err();

    assert!(matches!(err, ProviderError::Unreachable { .. }));
    assert!(err.to_string().contains("503"));
}

#[tokio::test]
async fn test_tmdb_details_missing_title_is_malformed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/movie/27205"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id": 27205 })))
        .mount(&mock_server)
        .await;

    let client = TMDbClient::new(http(), &config_for(&mock_server));
    let err = client.movie_details(27205).await.unwrap_err();

    assert!(matches!(err, ProviderError::Malformed { .. }));
}

#[tokio::test]
async fn test_tmdb_discover_pushes_filters() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/discover/movie"))
        .and(query_param("with_genres", "35|10749"))
        .and(query_param("vote_count.gte", "1000"))
        .and(query_param("include_adult", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "page": 1,
            "total_pages": 3,
            "results": [
                { "id": 1, "title": "First", "genre_ids": [35] },
                { "id": 2, "title": "Second", "genre_ids": [10749] }
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = TMDbClient::new(http(), &config_for(&mock_server));
    let query = DiscoverQuery {
        min_votes: Some(1000),
        with_genres: vec![35, 10749],
        ..Default::default()
    };

    let page = client.discover_movies(&query).await.unwrap();
    assert_eq!(page.total_pages, 3);
    let ids: Vec<i64> = page.results.iter().map(|t| t.provider_id).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[tokio::test]
async fn test_transport_failure_is_unreachable() {
    // Nothing listens on the discard port
    let mut config = ProviderConfig::with_credentials("a", "b", "c");
    config.tmdb_base_url = "http://127.0.0.1:9".to_string();

    let client = TMDbClient::new(http(), &config);
    let err = client.fetch("movie/1", &[]).await.unwrap_err();

    assert!(matches!(err, ProviderError::Unreachable { .. }));
}

#[tokio::test]
async fn test_timeout_is_unreachable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/movie/27205"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "id": 27205, "title": "Inception" }))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let client = TMDbClient::new(
        build_http_client(Duration::from_millis(200)).unwrap(),
        &config_for(&mock_server),
    );
    let err = client.movie_details(27205).await.unwrap_err();

    assert!(matches!(err, ProviderError::Unreachable { .. }));
}

#[tokio::test]
async fn test_omdb_false_response_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("apikey", "omdb-key"))
        .and(query_param("i", "tt0000001"))
        .and(query_param("plot", "full"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "Response": "False",
            "Error": "Incorrect IMDb ID."
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = OmdbClient::new(http(), &config_for(&mock_server));
    let err = client.by_imdb_id("tt0000001").await.unwrap_err();

    assert_eq!(
        err,
        ProviderError::NotFound {
            provider: "omdb",
            message: "Incorrect IMDb ID.".to_string()
        }
    );
}

#[tokio::test]
async fn test_omdb_invalid_key_is_unreachable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "Response": "False",
            "Error": "Invalid API key!"
        })))
        .mount(&mock_server)
        .await;

    let client = OmdbClient::new(http(), &config_for(&mock_server));
    let err = client.by_title("Inception", Some(2010)).await.unwrap_err();

    assert!(matches!(err, ProviderError::Unreachable { provider: "omdb", .. }));
}

#[tokio::test]
async fn test_omdb_record_ratings() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("t", "Inception"))
        .and(query_param("y", "2010"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "Title": "Inception",
            "imdbRating": "8.8",
            "Ratings": [{ "Source": "Rotten Tomatoes", "Value": "87%" }],
            "Metascore": "74",
            "Response": "True"
        })))
        .mount(&mock_server)
        .await;

    let client = OmdbClient::new(http(), &config_for(&mock_server));
    let record = client.by_title("Inception", Some(2010)).await.unwrap();
    let ratings = record.rating_set();

    assert_eq!(ratings.audience, Some(8.8));
    assert_eq!(ratings.critic_percentage, Some(87.0));
    assert_eq!(ratings.critic_weighted, Some(74.0));
}

#[tokio::test]
async fn test_trakt_headers_and_slug_resolution() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/tmdb/27205"))
        .and(query_param("type", "movie"))
        .and(header("trakt-api-key", "trakt-id"))
        .and(header("trakt-api-version", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
            "type": "movie",
            "score": 1000,
            "movie": {
                "title": "Inception",
                "year": 2010,
                "ids": { "trakt": 16662, "slug": "inception-2010", "imdb": "tt1375666", "tmdb": 27205 }
            }
        }])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = TraktClient::new(http(), &config_for(&mock_server));
    let slug = client.resolve_tmdb_id(27205).await.unwrap();

    assert_eq!(slug, "inception-2010");
}

#[tokio::test]
async fn test_trakt_empty_search_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/tmdb/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&mock_server)
        .await;

    let client = TraktClient::new(http(), &config_for(&mock_server));
    assert!(client.resolve_tmdb_id(1).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_trakt_404_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/movies/nope/stats"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let client = TraktClient::new(http(), &config_for(&mock_server));
    assert!(client.movie_stats("nope").await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_trakt_trending() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/shows/trending"))
        .and(query_param("limit", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "watchers": 120, "show": { "title": "Severance", "year": 2022, "ids": { "tmdb": 95396, "imdb": "tt11280740" } } },
            { "watchers": 80, "show": { "title": "The Bear", "year": 2022, "ids": { "tmdb": 136315 } } }
        ])))
        .mount(&mock_server)
        .await;

    let client = TraktClient::new(http(), &config_for(&mock_server));
    let entries = client.trending(TraktTrendingKind::Shows, 2).await.unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].title, "Severance");
    assert_eq!(entries[0].watchers, 120);
    assert_eq!(entries[1].imdb_id, None);
}

#[tokio::test]
async fn test_trakt_list_search_and_items() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/list"))
        .and(query_param("query", "cozy"))
        .and(query_param("limit", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "type": "list", "score": 40.2, "list": { "name": "Cozy Sunday", "ids": { "trakt": 501, "slug": "cozy-sunday" } } },
            { "type": "list", "score": 12.0, "list": { "name": "Broken entry" } }
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/lists/501/items/movies"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "rank": 1, "type": "movie", "movie": { "title": "Paddington 2", "year": 2017, "ids": { "tmdb": 346648 } } },
            { "rank": 2, "type": "movie", "movie": { "year": 2001 } }
        ])))
        .mount(&mock_server)
        .await;

    let client = TraktClient::new(http(), &config_for(&mock_server));
    let lists = client.search_lists("cozy", 3).await.unwrap();
    assert_eq!(
        lists,
        vec![TraktList {
            id: 501,
            name: "Cozy Sunday".to_string()
        }]
    );

    let movies = client.list_movies(&lists[0]).await.unwrap();
    assert_eq!(movies.len(), 1);
    assert_eq!(movies[0].tmdb_id, Some(346648));
    assert_eq!(movies[0].source_list.as_deref(), Some("Cozy Sunday"));
}

#[tokio::test]
async fn test_trakt_movie_listing_filters() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/movies/watched/all"))
        .and(query_param("genres", "horror"))
        .and(query_param("rt_meters", "0-60"))
        .and(query_param("limit", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "watcher_count": 900, "movie": { "title": "The Evil Dead", "year": 1981, "ids": { "tmdb": 764 } } },
            { "watcher_count": 700, "movie": { "title": "Army of Darkness", "year": 1992, "ids": { "tmdb": 766 } } },
            { "watcher_count": 500, "movie": { "title": "Extra", "year": 1990 } }
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/movies/popular"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "title": "Heat", "year": 1995, "ids": { "tmdb": 949, "imdb": "tt0113277" } }
        ])))
        .mount(&mock_server)
        .await;

    let client = TraktClient::new(http(), &config_for(&mock_server));

    let filters = [("genres", "horror".to_string()), ("rt_meters", "0-60".to_string())];
    let movies = client
        .movie_listing(TraktMovieListing::Watched, &filters, 2)
        .await
        .unwrap();
    let titles: Vec<&str> = movies.iter().map(|m| m.title.as_str()).collect();
    assert_eq!(titles, vec!["The Evil Dead", "Army of Darkness"]);

    let movies = client
        .movie_listing(TraktMovieListing::Popular, &[], 10)
        .await
        .unwrap();
    assert_eq!(movies[0].imdb_id.as_deref(), Some("tt0113277"));
}
