//! HTTP handlers and route configuration.

mod auth;
mod comments;
mod health;
mod posts;
mod subreddits;
mod users;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .route("/auth", web::post().to(auth::login))
            .service(
                web::scope("/user")
                    .route("/register", web::post().to(users::register))
                    .route("/me", web::get().to(users::me))
                    .route("/me", web::delete().to(users::delete_me)),
            )
            .service(
                web::scope("/subreddit")
                    .route("", web::get().to(subreddits::list))
                    .route("", web::post().to(subreddits::create))
                    .route("/me", web::get().to(subreddits::mine))
                    .route("/subscribe/{id}", web::put().to(subreddits::subscribe))
                    .route("/unsubscribe/{id}", web::put().to(subreddits::unsubscribe))
                    .route("/{id}", web::get().to(subreddits::get))
                    .route("/{id}", web::put().to(subreddits::update))
                    .route("/{id}", web::delete().to(subreddits::delete)),
            )
            .service(
                web::scope("/post")
                    .route("/user", web::get().to(posts::user_posts))
                    .route("/user/{id}", web::get().to(posts::user_post))
                    .route(
                        "/subreddit/{subreddit_id}",
                        web::get().to(posts::subreddit_posts),
                    )
                    .route(
                        "/subreddit/{subreddit_id}/{id}",
                        web::get().to(posts::subreddit_post),
                    )
                    .route("/upvote/{subreddit_id}/{id}", web::post().to(posts::upvote))
                    .route(
                        "/downvote/{subreddit_id}/{id}",
                        web::post().to(posts::downvote),
                    )
                    .route("/{subreddit_id}", web::post().to(posts::publish))
                    .route("/{id}", web::put().to(posts::edit))
                    .route("/{id}", web::delete().to(posts::delete)),
            )
            .service(
                web::scope("/comment")
                    .route(
                        "/upvote/{subreddit_id}/{post_id}/{id}",
                        web::put().to(comments::upvote),
                    )
                    .route(
                        "/downvote/{subreddit_id}/{post_id}/{id}",
                        web::put().to(comments::downvote),
                    )
                    .route("/{subreddit_id}/{post_id}", web::get().to(comments::list))
                    .route("/{subreddit_id}/{post_id}", web::post().to(comments::add))
                    .route(
                        "/{subreddit_id}/{post_id}/{id}",
                        web::put().to(comments::edit),
                    )
                    .route(
                        "/{subreddit_id}/{post_id}/{id}",
                        web::delete().to(comments::delete),
                    ),
            ),
    );
}
