use dynomodel::prelude::*;

fn registry() -> ModelRegistry {
    ModelRegistry::new()
        .with(
            ModelSchema::new("Post")
                .association(AssociationDeclaration::to_many("comments").inverse_of("post")),
        )
        .and_then(|r| {
            r.with(
                ModelSchema::new("Comment")
                    .index(IndexDescriptor::secondary(["post_id", "timestamp"]).named("by-post"))
                    .association(
                        AssociationDeclaration::to_one("post")
                            .foreign_key("post_id")
                            .inverse_of("comments"),
                    ),
            )
        })
        .expect("register models")
}

#[test]
fn find_index_for_registered_model() {
    let registry = registry();

    let by_id = Query::new().eq("id", "c1");
    let index = find_index_for(&registry, "Comment", &by_id)
        .expect("model registered")
        .expect("primary covers id");
    assert!(index.is_primary());

    let by_post = Query::new().eq("post_id", "p1").eq("timestamp", 3_i64);
    let index = find_index_for(&registry, "Comment", &by_post)
        .expect("model registered")
        .expect("secondary covers query");
    assert_eq!(index.name(), Some("by-post"));

    let partial = Query::new().eq("post_id", "p1");
    assert!(
        find_index_for(&registry, "Comment", &partial)
            .expect("model registered")
            .is_none()
    );
}

#[test]
fn find_index_for_unknown_model_is_configuration_error() {
    let registry = registry();
    let err = find_index_for(&registry, "Article", &Query::new()).unwrap_err();
    assert!(matches!(
        err,
        Error::Configuration(ConfigurationError::UnknownModel { .. })
    ));
}

#[test]
fn prelude_binds_associations() {
    let registry = registry();
    let mut post = registry.model("Post").expect("post").new_record().with("id", "p1");

    let comments = AnyAssociation::new(&registry, &mut post, "comments").expect("bind");
    assert_eq!(comments.kind(), AssociationKind::ToMany);
    assert_eq!(comments.declaration_field_name(), "comments_ids");

    let reference_fields: Vec<_> = registry
        .model("Comment")
        .expect("comment")
        .reference_fields()
        .map(|(name, _)| name.into_owned())
        .collect();
    assert_eq!(reference_fields, vec!["post_id".to_string()]);
}
