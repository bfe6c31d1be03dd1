//! Tests for dependency construction and merging.

use super::*;
use rstest::{fixture, rstest};

#[fixture]
fn hyper() -> CargoDependency {
    known::hyper()
}

#[rstest]
fn test_util_rejected_outside_dev_scope(hyper: CargoDependency) {
    let err = hyper
        .with_feature("test-util")
        .expect_err("compile scope must reject test-util");
    assert!(matches!(
        err,
        CodegenError::DevOnlyFeature { ref feature, .. } if feature == "test-util"
    ));
}

#[rstest]
fn descriptor_builder_rejects_test_util_eagerly() {
    let spec = DependencySpec {
        name: "smithy-runtime-api".to_owned(),
        location: DependencyLocation::crates_io("1.0.0"),
        scope: DependencyScope::Compile,
        optional: false,
        features: BTreeSet::from(["client".to_owned(), "test-util".to_owned()]),
        default_features: true,
        rust_name: None,
    };
    assert!(spec.build().is_err());
}

#[rstest]
fn moving_test_util_dependency_out_of_dev_fails() {
    let tokio = known::tokio_dev();
    assert!(tokio.with_scope(DependencyScope::Compile).is_err());
    assert!(tokio.with_scope(DependencyScope::Dev).is_ok());
}

#[rstest]
fn test_util_accepted_in_dev_scope(hyper: CargoDependency) {
    let dev = hyper
        .to_dev_dependency()
        .with_feature("test-util")
        .expect("dev scope accepts test-util");
    assert!(dev.features().contains("test-util"));
}

#[rstest]
fn merge_unions_features(hyper: CargoDependency) {
    let with_stream = known::hyper_with_stream();
    let with_http2 = hyper.with_feature("http2").expect("valid feature");

    let merged = with_stream.merge(&with_http2).expect("same key");
    let features: Vec<&str> = merged.features().iter().map(String::as_str).collect();
    assert_eq!(features, vec!["http2", "stream"]);
}

#[rstest]
fn merge_is_commutative_and_idempotent(hyper: CargoDependency) {
    let a = hyper.with_feature("stream").expect("valid feature");
    let b = hyper
        .with_feature("client")
        .expect("valid feature")
        .without_default_features()
        .into_optional();

    let ab = a.merge(&b).expect("same key");
    let ba = b.merge(&a).expect("same key");
    let abb = ab.merge(&b).expect("same key");

    assert_eq!(ab, ba);
    assert_eq!(ab, abb);
}

#[rstest]
fn disabling_default_features_wins(hyper: CargoDependency) {
    let disabled = hyper.without_default_features();

    let merged = hyper.merge(&disabled).expect("same key");
    assert!(!merged.default_features());
    let reversed = disabled.merge(&hyper).expect("same key");
    assert!(!reversed.default_features());
}

#[rstest]
fn merge_is_required_unless_both_optional(hyper: CargoDependency) {
    let optional = hyper.clone().into_optional();
    assert!(!hyper.merge(&optional).expect("same key").is_optional());
    assert!(optional.merge(&optional).expect("same key").is_optional());
}

#[rstest]
fn merge_rejects_different_keys(hyper: CargoDependency) {
    let dev = hyper.to_dev_dependency();
    let err = hyper.merge(&dev).expect_err("scopes differ");
    assert!(matches!(err, CodegenError::MergeKeyMismatch { .. }));
}

#[rstest]
#[case::registry(DependencyLocation::crates_io("0.14.26"), "0.14.26")]
#[case::local_without_version(DependencyLocation::local("../runtime", None), LOCAL_VERSION)]
#[case::local_with_version(
    DependencyLocation::local("../runtime", Some("0.56.1".to_owned())),
    "0.56.1"
)]
fn version_reflects_location(#[case] location: DependencyLocation, #[case] expected: &str) {
    let dependency = CargoDependency::new("hyper", location);
    assert_eq!(dependency.version(), expected);
}

#[rstest]
fn rust_name_replaces_dashes() {
    assert_eq!(known::futures_core().rust_name(), "futures_core");
    assert_eq!(known::md5().rust_name(), "md5");
}

#[rstest]
fn display_lists_features_and_scope() {
    let rendered = known::tokio_dev().to_string();
    assert_eq!(
        rendered,
        "tokio = { version = \"1.23.1\", features = [\"macros\",\"rt-multi-thread\",\"test-util\"], scope = Dev }"
    );
}
