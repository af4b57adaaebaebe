use restcheck::contract::{POST_KEYS, check_exact_keys};
use restcheck::{Post, Resource};
use serde_json::Value;

use super::test_utilities::{StubApi, TestClient};

#[tokio::test]
async fn test_list_posts_returns_well_formed_collection() {
    let api = StubApi::start().await;
    let client = api.api_client();

    let response = client.list(Resource::Posts).await.unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    let items = body.as_array().expect("collection is an array");
    assert!(!items.is_empty());
    for item in items {
        assert!(check_exact_keys("GET /posts", item, POST_KEYS).is_empty());
    }

    let posts: Vec<Post> = serde_json::from_value(body).unwrap();
    assert!(posts.iter().all(|post| post.user_id >= 1));
}

#[tokio::test]
async fn test_get_post_by_valid_ids() {
    let api = StubApi::start().await;
    let client = api.api_client();

    for id in [1u64, 10, 99] {
        let response = client.get_raw(Resource::Posts, &id.to_string()).await.unwrap();
        assert_eq!(response.status(), 200);
        let post: Post = response.json().await.unwrap();
        assert_eq!(post.id, id);
        assert!(!post.title.is_empty());
        assert!(!post.body.is_empty());
    }
}

#[tokio::test]
async fn test_get_post_malformed_ids_return_404() {
    let api = StubApi::start().await;
    let client = api.api_client();

    for raw in ["-1", "0", "999999", "non-numeric", "1/1", "/ff"] {
        let response = client.get_raw(Resource::Posts, raw).await.unwrap();
        assert_eq!(response.status(), 404, "GET /posts/{raw}");
    }
}

#[tokio::test]
async fn test_filter_posts_by_user() {
    let api = StubApi::start().await;
    let client = api.api_client();

    for user_id in [1u64, 10] {
        let response = client
            .filtered(Resource::Posts, "userId", &user_id.to_string())
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        let posts: Vec<Post> = response.json().await.unwrap();
        assert!(!posts.is_empty());
        assert!(posts.iter().all(|post| post.user_id == user_id));
    }
}

#[tokio::test]
async fn test_filter_posts_without_match_returns_empty_200() {
    let api = StubApi::start().await;
    let helper = TestClient::new(&api);

    for value in ["zzz", "9999", "-1"] {
        let response = helper
            .client
            .get(format!("{}/posts", helper.base_url))
            .query(&[("userId", value)])
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body, serde_json::json!([]), "userId={value}");
    }
}
