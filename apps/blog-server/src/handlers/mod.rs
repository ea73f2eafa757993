//! HTTP handlers and route configuration.

mod form;
mod health;
mod posts;
mod render;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/posts")
                .route("", web::get().to(posts::index))
                .route("", web::post().to(posts::store))
                // Must precede `/{post}`
                .route("/create", web::get().to(posts::create))
                .route("/{post}", web::get().to(posts::show))
                .route("/{post}", web::put().to(posts::update))
                .route("/{post}", web::patch().to(posts::update))
                .route("/{post}", web::delete().to(posts::destroy))
                .route("/{post}/edit", web::get().to(posts::edit)),
        );
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::cookie::Cookie;
    use actix_web::http::{StatusCode, header};
    use actix_web::{App, test};
    use blog_infra::storage::InMemoryFileStorage;
    use serde_json::Value;

    use super::*;
    use crate::state::AppState;

    const BOUNDARY: &str = "----blog-test-boundary";
    const PNG: &[u8] = b"\x89PNG\r\n\x1a\n0000";

    struct Thumbnail<'a> {
        file_name: &'a str,
        content_type: &'a str,
        data: &'a [u8],
    }

    fn multipart_body(fields: &[(&str, &str)], thumbnail: Option<Thumbnail<'_>>) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some(file) = thumbnail {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"thumbnail\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                    file.file_name, file.content_type
                )
                .as_bytes(),
            );
            body.extend_from_slice(file.data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn post_form(title: &str) -> Vec<u8> {
        multipart_body(
            &[
                ("title", title),
                ("content", "Body text"),
                ("category", "1"),
                ("tags[]", "1"),
                ("tags[]", "2"),
            ],
            Some(Thumbnail {
                file_name: "cover.png",
                content_type: "image/png",
                data: PNG,
            }),
        )
    }

    fn multipart_request(req: test::TestRequest, body: Vec<u8>) -> test::TestRequest {
        req.insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(body)
    }

    fn store_request(title: &str) -> test::TestRequest {
        multipart_request(test::TestRequest::post().uri("/posts"), post_form(title))
    }

    fn state_with(storage: Arc<InMemoryFileStorage>, max_upload_bytes: usize) -> AppState {
        AppState::in_memory(storage, max_upload_bytes)
    }

    #[actix_web::test]
    async fn test_store_redirects_with_flash_and_lists_post() {
        let storage = Arc::new(InMemoryFileStorage::new());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_with(storage.clone(), 1024 * 1024)))
                .configure(configure_routes),
        )
        .await;

        let req = store_request("Hello World Example").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/posts");
        let flash = resp
            .response()
            .cookies()
            .find(|c| c.name() == "flash")
            .expect("flash cookie");
        assert_eq!(flash.value(), "post-created");

        let paths = storage.paths().await;
        assert_eq!(paths.len(), 1);
        assert!(paths[0].starts_with("images/posts/"));
        assert!(paths[0].ends_with(".png"));

        let req = test::TestRequest::get()
            .uri("/posts")
            .cookie(Cookie::new("flash", "post-created"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["view"], "posts.index");
        assert_eq!(body["message"], "The new post was created successfully.");
        assert_eq!(body["data"]["posts"][0]["slug"], "hello-world-example");
        assert_eq!(body["data"]["pagination"]["total"], 1);
    }

    #[actix_web::test]
    async fn test_store_validation_failure_returns_form_errors() {
        let storage = Arc::new(InMemoryFileStorage::new());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_with(storage.clone(), 1024 * 1024)))
                .configure(configure_routes),
        )
        .await;

        let req = store_request("Short").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["view"], "posts.create");
        assert!(body["errors"]["title"].is_array());
        assert!(storage.paths().await.is_empty());
    }

    #[actix_web::test]
    async fn test_oversized_upload_is_rejected() {
        let storage = Arc::new(InMemoryFileStorage::new());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_with(storage.clone(), 4)))
                .configure(configure_routes),
        )
        .await;

        let req = store_request("Hello World Example").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert!(storage.paths().await.is_empty());
    }

    #[actix_web::test]
    async fn test_destroy_removes_post_and_thumbnail() {
        let storage = Arc::new(InMemoryFileStorage::new());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_with(storage.clone(), 1024 * 1024)))
                .configure(configure_routes),
        )
        .await;

        let req = store_request("Hello World Example").to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::FOUND
        );

        let req = test::TestRequest::delete().uri("/posts/1").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        let flash = resp
            .response()
            .cookies()
            .find(|c| c.name() == "flash")
            .expect("flash cookie");
        assert_eq!(flash.value(), "post-deleted");
        assert!(storage.paths().await.is_empty());

        let req = test::TestRequest::get().uri("/posts/1").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_update_without_thumbnail_keeps_file() {
        let storage = Arc::new(InMemoryFileStorage::new());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_with(storage.clone(), 1024 * 1024)))
                .configure(configure_routes),
        )
        .await;

        let req = store_request("Hello World Example").to_request();
        test::call_service(&app, req).await;
        let original = storage.paths().await;

        let body = multipart_body(
            &[
                ("title", "Renamed Post Title"),
                ("content", "New body"),
                ("category", "2"),
                ("tags", "3"),
            ],
            None,
        );
        let req = multipart_request(test::TestRequest::put().uri("/posts/1"), body).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(storage.paths().await, original);

        let req = test::TestRequest::get().uri("/posts/1").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["view"], "posts.show");
        assert_eq!(body["data"]["post"]["title"], "Renamed Post Title");
        assert_eq!(body["data"]["post"]["slug"], "hello-world-example");
        assert_eq!(body["data"]["post"]["thumbnail"], original[0].as_str());
        assert_eq!(body["data"]["tags"].as_array().unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn test_edit_of_missing_post_is_not_found() {
        let storage = Arc::new(InMemoryFileStorage::new());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_with(storage, 1024)))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/posts/42/edit").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::get().uri("/posts/create").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["view"], "posts.create");
        assert_eq!(body["data"]["categories"].as_array().unwrap().len(), 3);
    }

    #[actix_web::test]
    async fn test_disguised_thumbnail_is_rejected() {
        let storage = Arc::new(InMemoryFileStorage::new());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_with(storage.clone(), 1024 * 1024)))
                .configure(configure_routes),
        )
        .await;

        let body = multipart_body(
            &[
                ("title", "Hello World Example"),
                ("content", "Body text"),
                ("category", "1"),
                ("tags", "1"),
            ],
            Some(Thumbnail {
                file_name: "evil.jpg",
                content_type: "image/jpeg",
                data: b"<?php system($_GET['c']); ?>",
            }),
        );
        let req = multipart_request(test::TestRequest::post().uri("/posts"), body).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["errors"]["thumbnail"][0], "The thumbnail must be an image.");
        assert!(storage.paths().await.is_empty());
    }

    #[actix_web::test]
    async fn test_health_check() {
        let storage = Arc::new(InMemoryFileStorage::new());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_with(storage, 1024)))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["database_connected"], false);
    }
}
