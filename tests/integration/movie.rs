use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

use cinelog::entity::{comment, movie, rating};

use crate::common::{TestApp, location};

#[tokio::test]
async fn movie_pages_require_a_login() {
    let app = TestApp::spawn().await;

    assert_eq!(app.get("/new_movie").await.status(), 403);
    assert_eq!(
        app.post_form("/create_movie", &[("title", "Dune")])
            .await
            .status(),
        403
    );
}

#[tokio::test]
async fn create_movie_rejects_a_wrong_csrf_token() {
    let app = TestApp::spawn().await;
    app.register_and_login("alice", "pw1234").await;

    let res = app
        .post_form(
            "/create_movie",
            &[
                ("csrf_token", "00000000000000000000000000000000"),
                ("title", "Dune"),
                ("description", "Desert planet."),
                ("release_year", "2021"),
            ],
        )
        .await;

    assert_eq!(res.status(), 403);
    assert_eq!(movie::Entity::find().count(&app.db).await.unwrap(), 0);
}

#[tokio::test]
async fn create_movie_rejects_a_missing_csrf_token() {
    let app = TestApp::spawn().await;
    app.register_and_login("alice", "pw1234").await;

    let res = app
        .post_form(
            "/create_movie",
            &[
                ("title", "Dune"),
                ("description", "Desert planet."),
                ("release_year", "2021"),
            ],
        )
        .await;

    assert_eq!(res.status(), 403);
}

#[tokio::test]
async fn created_movie_shows_its_genres_and_create_inserts_exactly_once() {
    let app = TestApp::spawn().await;
    app.register_and_login("alice", "pw1234").await;

    let id = app.create_movie("Dune", "2021", &["1", "3"]).await;

    let page = app.get_text(&format!("/movie/{id}")).await;
    assert!(page.contains("Dune"));
    assert!(page.contains("Action, Comedy"));
    assert!(page.contains("No ratings yet"));
    assert_eq!(movie::Entity::find().count(&app.db).await.unwrap(), 1);
}

#[tokio::test]
async fn updating_replaces_the_genre_set() {
    let app = TestApp::spawn().await;
    app.register_and_login("alice", "pw1234").await;
    let id = app.create_movie("Dune", "2021", &["1", "3"]).await;
    let csrf = app.csrf_token().await;

    let res = app
        .post_form(
            "/update_movie",
            &[
                ("csrf_token", csrf.as_str()),
                ("movie_id", &id.to_string()),
                ("title", "Dune"),
                ("description", "Desert planet."),
                ("release_year", "2021"),
                ("genres", "2"),
            ],
        )
        .await;
    assert_eq!(res.status(), 303);

    let page = app.get_text(&format!("/movie/{id}")).await;
    assert!(page.contains("Adventure"));
    assert!(!page.contains("Action, Comedy"));
}

#[tokio::test]
async fn non_numeric_genre_values_are_dropped_silently() {
    let app = TestApp::spawn().await;
    app.register_and_login("alice", "pw1234").await;

    let id = app.create_movie("Dune", "2021", &["1", "abc", ""]).await;

    let page = app.get_text(&format!("/movie/{id}")).await;
    assert!(page.contains("Genres: Action"));
}

#[tokio::test]
async fn overlong_title_is_forbidden() {
    let app = TestApp::spawn().await;
    app.register_and_login("alice", "pw1234").await;
    let csrf = app.csrf_token().await;
    let long_title = "a".repeat(101);

    let res = app
        .post_form(
            "/create_movie",
            &[
                ("csrf_token", csrf.as_str()),
                ("title", long_title.as_str()),
                ("description", "Desert planet."),
                ("release_year", "2021"),
            ],
        )
        .await;

    assert_eq!(res.status(), 403);
}

#[tokio::test]
async fn non_numeric_release_year_is_forbidden() {
    let app = TestApp::spawn().await;
    app.register_and_login("alice", "pw1234").await;
    let csrf = app.csrf_token().await;

    let res = app
        .post_form(
            "/create_movie",
            &[
                ("csrf_token", csrf.as_str()),
                ("title", "Dune"),
                ("description", "Desert planet."),
                ("release_year", "twenty21"),
            ],
        )
        .await;

    assert_eq!(res.status(), 403);
}

#[tokio::test]
async fn only_the_owner_may_edit_or_remove() {
    let alice = TestApp::spawn().await;
    alice.register_and_login("alice", "pw1234").await;
    let id = alice.create_movie("Dune", "2021", &["1"]).await;

    // Same client, different account: logging in replaces the session user.
    alice.register_and_login("bob", "pw5678").await;

    assert_eq!(alice.get(&format!("/edit_movie/{id}")).await.status(), 403);
    assert_eq!(alice.get(&format!("/remove_movie/{id}")).await.status(), 403);

    let csrf = alice.csrf_token().await;
    let res = alice
        .post_form(
            "/update_movie",
            &[
                ("csrf_token", csrf.as_str()),
                ("movie_id", &id.to_string()),
                ("title", "Hijacked"),
                ("description", "Nope."),
                ("release_year", "2021"),
            ],
        )
        .await;
    assert_eq!(res.status(), 403);
}

#[tokio::test]
async fn unknown_movie_is_not_found() {
    let app = TestApp::spawn().await;
    assert_eq!(app.get("/movie/4242").await.status(), 404);

    app.register_and_login("alice", "pw1234").await;
    assert_eq!(app.get("/edit_movie/4242").await.status(), 404);
}

#[tokio::test]
async fn remove_answers_for_the_movie_before_the_token() {
    let app = TestApp::spawn().await;
    app.register_and_login("alice", "pw1234").await;

    // Unknown movie: 404 wins even when the token is wrong.
    let res = app
        .post_form(
            "/remove_movie/4242",
            &[
                ("csrf_token", "00000000000000000000000000000000"),
                ("remove", "Remove"),
            ],
        )
        .await;
    assert_eq!(res.status(), 404);

    // Known, owned movie: the bad token is now the problem.
    let id = app.create_movie("Dune", "2021", &["1"]).await;
    let res = app
        .post_form(
            &format!("/remove_movie/{id}"),
            &[
                ("csrf_token", "00000000000000000000000000000000"),
                ("remove", "Remove"),
            ],
        )
        .await;
    assert_eq!(res.status(), 403);
    assert_eq!(app.get(&format!("/movie/{id}")).await.status(), 200);
}

#[tokio::test]
async fn remove_flow_confirms_then_deletes_everything() {
    let app = TestApp::spawn().await;
    app.register_and_login("alice", "pw1234").await;
    let id = app.create_movie("Dune", "2021", &["1", "3"]).await;
    let csrf = app.csrf_token().await;
    app.post_form(
        "/add_rating",
        &[
            ("csrf_token", csrf.as_str()),
            ("movie_id", &id.to_string()),
            ("rating", "5"),
        ],
    )
    .await;
    app.post_form(
        "/add_comment",
        &[
            ("csrf_token", csrf.as_str()),
            ("movie_id", &id.to_string()),
            ("content", "Epic."),
        ],
    )
    .await;

    // Confirmation page first.
    let confirm = app.get(&format!("/remove_movie/{id}")).await;
    assert_eq!(confirm.status(), 200);

    // Posting without the remove field cancels.
    let res = app
        .post_form(
            &format!("/remove_movie/{id}"),
            &[("csrf_token", csrf.as_str())],
        )
        .await;
    assert_eq!(res.status(), 303);
    assert_eq!(location(&res), format!("/movie/{id}"));
    assert_eq!(app.get(&format!("/movie/{id}")).await.status(), 200);

    // Posting with it deletes the movie and its children.
    let res = app
        .post_form(
            &format!("/remove_movie/{id}"),
            &[("csrf_token", csrf.as_str()), ("remove", "Remove")],
        )
        .await;
    assert_eq!(res.status(), 303);
    assert_eq!(location(&res), "/");

    assert_eq!(app.get(&format!("/movie/{id}")).await.status(), 404);
    assert_eq!(
        rating::Entity::find()
            .filter(rating::Column::MovieId.eq(id))
            .count(&app.db)
            .await
            .unwrap(),
        0
    );
    assert_eq!(
        comment::Entity::find()
            .filter(comment::Column::MovieId.eq(id))
            .count(&app.db)
            .await
            .unwrap(),
        0
    );
}

#[tokio::test]
async fn three_ratings_average_to_four() {
    let app = TestApp::spawn().await;
    app.register_and_login("alice", "pw1234").await;
    let id = app.create_movie("Dune", "2021", &[]).await;
    let csrf = app.csrf_token().await;

    for value in ["5", "3", "4"] {
        let res = app
            .post_form(
                "/add_rating",
                &[
                    ("csrf_token", csrf.as_str()),
                    ("movie_id", &id.to_string()),
                    ("rating", value),
                ],
            )
            .await;
        assert_eq!(res.status(), 303);
    }

    let page = app.get_text(&format!("/movie/{id}")).await;
    assert!(page.contains("4.00 / 5 (3 ratings)"));
}

#[tokio::test]
async fn out_of_range_rating_is_bad_input() {
    let app = TestApp::spawn().await;
    app.register_and_login("alice", "pw1234").await;
    let id = app.create_movie("Dune", "2021", &[]).await;
    let csrf = app.csrf_token().await;

    for value in ["0", "6", "five"] {
        let res = app
            .post_form(
                "/add_rating",
                &[
                    ("csrf_token", csrf.as_str()),
                    ("movie_id", &id.to_string()),
                    ("rating", value),
                ],
            )
            .await;
        assert_eq!(res.status(), 400, "rating {value:?} should be rejected");
    }
    assert_eq!(rating::Entity::find().count(&app.db).await.unwrap(), 0);
}

#[tokio::test]
async fn empty_comment_is_flashed_and_not_stored() {
    let app = TestApp::spawn().await;
    app.register_and_login("alice", "pw1234").await;
    let id = app.create_movie("Dune", "2021", &[]).await;
    let csrf = app.csrf_token().await;

    let res = app
        .post_form(
            "/add_comment",
            &[
                ("csrf_token", csrf.as_str()),
                ("movie_id", &id.to_string()),
                ("content", "   \n  "),
            ],
        )
        .await;

    assert_eq!(res.status(), 303);
    assert_eq!(location(&res), format!("/movie/{id}"));
    let page = app.get_text(&format!("/movie/{id}")).await;
    assert!(page.contains("Error: comment cannot be empty"));
    assert_eq!(comment::Entity::find().count(&app.db).await.unwrap(), 0);
}

#[tokio::test]
async fn comment_markup_is_escaped_and_newlines_become_breaks() {
    let app = TestApp::spawn().await;
    app.register_and_login("alice", "pw1234").await;
    let id = app.create_movie("Dune", "2021", &[]).await;
    let csrf = app.csrf_token().await;

    app.post_form(
        "/add_comment",
        &[
            ("csrf_token", csrf.as_str()),
            ("movie_id", &id.to_string()),
            ("content", "<b>bold</b>\nsecond line"),
        ],
    )
    .await;

    let page = app.get_text(&format!("/movie/{id}")).await;
    assert!(page.contains("&lt;b&gt;bold&lt;/b&gt;<br />second line"));
    assert!(!page.contains("<b>bold</b>"));
}

#[tokio::test]
async fn comments_render_newest_first() {
    let app = TestApp::spawn().await;
    app.register_and_login("alice", "pw1234").await;
    let id = app.create_movie("Dune", "2021", &[]).await;
    let csrf = app.csrf_token().await;

    for content in ["first comment", "second comment"] {
        app.post_form(
            "/add_comment",
            &[
                ("csrf_token", csrf.as_str()),
                ("movie_id", &id.to_string()),
                ("content", content),
            ],
        )
        .await;
    }

    let page = app.get_text(&format!("/movie/{id}")).await;
    let first = page.find("first comment").unwrap();
    let second = page.find("second comment").unwrap();
    assert!(second < first, "newest comment should come first");
}

#[tokio::test]
async fn search_matches_substrings_case_insensitively() {
    let app = TestApp::spawn().await;
    app.register_and_login("alice", "pw1234").await;
    app.create_movie("Dune", "2021", &[]).await;
    app.create_movie("Moon", "2009", &[]).await;

    let page = app.get_text("/find_movie?query=UN").await;
    assert!(page.contains("Dune"));
    assert!(!page.contains("Moon"));

    let none = app.get_text("/find_movie?query=zzz").await;
    assert!(none.contains("No movies matched."));
}

#[tokio::test]
async fn search_without_a_query_shows_no_results_section() {
    let app = TestApp::spawn().await;
    app.register_and_login("alice", "pw1234").await;
    app.create_movie("Dune", "2021", &[]).await;

    let page = app.get_text("/find_movie").await;
    assert!(!page.contains("No movies matched."));
    assert!(!page.contains("/movie/"));
}

#[tokio::test]
async fn index_lists_movies_in_title_order() {
    let app = TestApp::spawn().await;
    app.register_and_login("alice", "pw1234").await;
    app.create_movie("Zodiac", "2007", &[]).await;
    app.create_movie("Alien", "1979", &[]).await;

    let page = app.get_text("/").await;
    let alien = page.find("Alien").unwrap();
    let zodiac = page.find("Zodiac").unwrap();
    assert!(alien < zodiac);
}
