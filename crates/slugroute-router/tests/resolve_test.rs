//! Forward resolution against the in-memory store

mod common;

use common::*;
use mockall::mock;
use serde_json::json;
use slugroute_core::{
    DataStore, EntityId, Error, LookupOptions, ParentLink, Predicate, Result, Row, RouterSettings,
    RuleOptions, SearchOptions,
};
use slugroute_router::{Resolution, Router};
use slugroute_store::InMemoryStore;

mock! {
    pub Store {}
    impl DataStore for Store {
        fn point_lookup(
            &self,
            table: &str,
            predicate: &Predicate,
            options: &LookupOptions,
        ) -> Result<Option<Row>>;
        fn ranked_search(
            &self,
            table: &str,
            predicate: &Predicate,
            options: &SearchOptions,
        ) -> Result<Option<EntityId>>;
    }
}

fn resolution(controller: &str, id: Option<EntityId>, rule_index: usize) -> Option<Resolution> {
    Some(Resolution {
        controller: controller.to_string(),
        id,
        rule_index,
    })
}

#[test]
fn test_resolve_two_level_chain() {
    let router = router();
    let store = store();
    let mut session = router.session(&store);

    let found = session.resolve(&split("shop/clothing/shoes/42-red-shoes"), PRODUCT).unwrap();
    assert_eq!(found, resolution("Product", Some(42), PRODUCT));

    let found = session.resolve(&split("shop/sports/shoes/43-red-shoes"), PRODUCT).unwrap();
    assert_eq!(found, resolution("Product", Some(43), PRODUCT));
}

#[test]
fn test_resolve_id_outside_category_is_no_match() {
    let router = router();
    let store = store();
    let mut session = router.session(&store);

    // 42 exists, but not under sports/shoes
    let found = session.resolve(&split("shop/sports/shoes/42-red-shoes"), PRODUCT).unwrap();
    assert_eq!(found, None);

    let found = session.resolve(&split("shop/clothing/shoes/99-red-shoes"), PRODUCT).unwrap();
    assert_eq!(found, None);
}

#[test]
fn test_resolve_unknown_category_is_no_match() {
    let router = router();
    let store = store();
    let mut session = router.session(&store);

    let found = session.resolve(&split("shop/garden/shoes/42-red-shoes"), PRODUCT).unwrap();
    assert_eq!(found, None);
    assert_eq!(session.context().active_id, None);
}

#[test]
fn test_resolve_name_surname_prefers_shortest_match() {
    let router = router();
    let store = store();
    let mut session = router.session(&store);

    let found = session.resolve(&split("people/diego-de-la-vega"), PERSON).unwrap();
    assert_eq!(found, resolution("Person", Some(1), PERSON));
}

#[test]
fn test_resolve_length_indexed_table() {
    let mut store = InMemoryStore::new();
    store
        .insert("people", json!({ "id": 1, "name": "Diego", "surname": "Vega", "zk_char_length": 30 }))
        .unwrap();
    store
        .insert("people", json!({ "id": 2, "name": "Diego", "surname": "Vega", "zk_char_length": 10 }))
        .unwrap();

    let router = Router::builder()
        .settings(RouterSettings {
            char_length_indexed: vec!["people".to_string()],
            ..Default::default()
        })
        .rule("Person", "people/[el:name]-[el:surname]", RuleOptions::default().table("people"))
        .build()
        .unwrap();

    let found = router.session(&store).resolve(&split("people/diego-vega"), 0).unwrap();
    assert_eq!(found.unwrap().id, Some(2));
}

#[test]
fn test_resolve_more_fields_than_words_skips_store() {
    let router = router();
    let store = store();
    let mut session = router.session(&store);

    let found = session.resolve(&split("people/diego"), PERSON).unwrap();
    assert_eq!(found, None);
    assert_eq!(store.stats().total(), 0);
}

#[test]
fn test_resolve_null_token_category() {
    let router = router();
    let store = store();
    let mut session = router.session(&store);

    let found = session.resolve(&split("news/none/hello-world"), NEWS).unwrap();
    assert_eq!(found, resolution("News", Some(7), NEWS));

    // Season Opening sits under a category, not under the null token
    let found = session.resolve(&split("news/none/season-opening"), NEWS).unwrap();
    assert_eq!(found, None);

    let found = session.resolve(&split("news/sports/season-opening"), NEWS).unwrap();
    assert_eq!(found, resolution("News", Some(8), NEWS));
}

#[test]
fn test_resolve_null_token_level_skips_store() {
    let router = router();
    let store = store();

    let found = router.session(&store).resolve(&split("news/none/hello-world"), NEWS).unwrap();
    assert_eq!(found, resolution("News", Some(7), NEWS));

    // Only the element search reaches the store
    assert_eq!(store.stats().ranked_searches(), 1);
    assert_eq!(store.stats().point_lookups(), 0);
}

#[test]
fn test_resolve_element_without_category() {
    let router = Router::builder()
        .rule("Product", "products/[el:id]", RuleOptions::default().table("products"))
        .build()
        .unwrap();
    let store = store();
    let mut session = router.session(&store);

    let found = session.resolve(&split("products/42"), 0).unwrap();
    assert_eq!(found, resolution("Product", Some(42), 0));

    let found = session.resolve(&split("products/99"), 0).unwrap();
    assert_eq!(found, None);
}

#[test]
fn test_resolve_mixed_segment() {
    let router = router();
    let store = store();
    let mut session = router.session(&store);

    let found = session.resolve(&split("outlet/red-shoes-shoes"), OUTLET).unwrap();
    assert_eq!(found, resolution("Product", Some(42), OUTLET));
}

#[test]
fn test_resolve_literal_rule() {
    let router = router();
    let store = store();
    let mut session = router.session(&store);

    let found = session.resolve(&[""], HOME).unwrap();
    assert_eq!(found, resolution("Home", None, HOME));
    assert_eq!(session.context().active_controller.as_deref(), Some("Home"));
    assert_eq!(store.stats().total(), 0);
}

#[test]
fn test_resolve_unknown_rule_index() {
    let router = router();
    let store = store();
    assert_eq!(router.session(&store).resolve(&["x"], 99).unwrap(), None);
}

#[test]
fn test_resolve_notifies_hydrator_and_sets_context() {
    let router = router();
    let store = store();
    let hydrator = RecordingHydrator::default();
    let mut session = router.session(&store).with_hydrator(&hydrator);

    session.resolve(&split("shop/clothing/shoes/42-red-shoes"), PRODUCT).unwrap();

    assert_eq!(*hydrator.loaded.borrow(), vec![("Product".to_string(), 42)]);
    assert_eq!(session.context().active_controller.as_deref(), Some("Product"));
    assert_eq!(session.context().active_id, Some(42));
}

#[test]
fn test_resolve_without_element_key_skips_hydrator() {
    let router = router();
    let store = store();
    let hydrator = RecordingHydrator::default();
    let mut session = router.session(&store).with_hydrator(&hydrator);

    let found = session.resolve(&split("people/diego-de-la-vega"), PERSON).unwrap();
    assert!(found.is_some());
    assert!(hydrator.loaded.borrow().is_empty());
}

#[test]
fn test_coarse_match_then_resolve() {
    let router = router();
    let store = store();
    let path = "shop/clothing/shoes/42-red-shoes";

    let index = router.matchers().first_match(path).unwrap();
    assert_eq!(index, PRODUCT);
    assert_eq!(router.matchers().first_match("people/diego-de-la-vega"), Some(PERSON));
    assert_eq!(router.matchers().first_match(""), Some(HOME));

    let found = router.session(&store).resolve(&split(path), index).unwrap();
    assert_eq!(found.unwrap().id, Some(42));
}

#[test]
fn test_snapshot_resolves_like_the_built_router() {
    let router = Router::from_snapshot(router().snapshot()).unwrap();
    let store = store();

    let found = router
        .session(&store)
        .resolve(&split("shop/clothing/shoes/42-red-shoes"), PRODUCT)
        .unwrap();
    assert_eq!(found, resolution("Product", Some(42), PRODUCT));
}

#[test]
fn test_store_failure_propagates() {
    let router = Router::builder()
        .rule(
            "News",
            "news/[p:name]/[el:title]",
            RuleOptions::default()
                .table("news")
                .parent(ParentLink::new("categories", "category")),
        )
        .build()
        .unwrap();

    let mut store = MockStore::new();
    store
        .expect_ranked_search()
        .times(1)
        .returning(|_, _, _| Err(Error::store("connection lost")));

    let result = router.session(&store).resolve(&split("news/sports/opening"), 0);
    assert!(matches!(result, Err(Error::Store(_))));
}

#[test]
fn test_direct_id_scoped_by_category() {
    let router = Router::builder()
        .rule(
            "Product",
            "shop/[p:id]/[el:id]",
            RuleOptions::default()
                .table("products")
                .parent(ParentLink::new("categories", "category")),
        )
        .build()
        .unwrap();

    let mut store = MockStore::new();
    store
        .expect_point_lookup()
        .withf(|table: &str, predicate: &Predicate, _: &LookupOptions| {
            table == "products"
                && *predicate
                    == Predicate::and(vec![Predicate::eq("id", 42), Predicate::eq("category", 2)])
        })
        .times(1)
        .returning(|_, _, _| Ok(json!({ "id": 42 }).as_object().cloned()));

    let found = router.session(&store).resolve(&split("shop/2/42"), 0).unwrap();
    assert_eq!(found.unwrap().id, Some(42));
}
