//! Testing utilities for recforge workspace
//!
//! Shared construction specs, field sets and cacheable objects.

#![allow(missing_docs)]

use recforge_build::{BuildSpec, FieldSet, RecordBuilder};
use recforge_cache::{CacheObject, Identity};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::borrow::Cow;

/// Spec for a model step: one record per contrast, contrast scrubbed after
/// assembly, regressor names carried unbroadcast
pub fn model_step_spec() -> BuildSpec {
    BuildSpec::new()
        .with_tags(["model", "contrast"])
        .with_images(["effect", "variance", "z"])
        .with_vals(["dof"])
        .with_metadata(["regressors"])
        .with_nobroadcast(["regressors"])
        .with_delete(["contrast"])
}

/// Spec for a first-level statistics step
pub fn statmap_spec() -> BuildSpec {
    BuildSpec::new()
        .with_tags(["sub", "task", "feature"])
        .with_images(["effect", "variance", "z", "sigmasquareds", "mask"])
        .with_vals(["dof"])
}

/// Builder for [`statmap_spec`]
pub fn statmap_builder() -> RecordBuilder {
    RecordBuilder::new(statmap_spec()).unwrap()
}

/// Base tags shared by one subject's outputs
pub fn subject_tags(sub: &str) -> serde_json::Value {
    json!({"sub": sub, "task": "faces"})
}

/// Fields for one subject with `n` features
pub fn subject_fields(sub: &str, n: usize) -> FieldSet {
    let features: Vec<String> = (1..=n).map(|i| format!("feature{i}")).collect();
    let images = |kind: &str| -> Vec<String> {
        (1..=n)
            .map(|i| format!("/work/sub-{sub}/feature{i}/{kind}.nii.gz"))
            .collect()
    };

    FieldSet::new()
        .with("tags", subject_tags(sub))
        .with("feature", json!(features))
        .with("effect", json!(images("effect")))
        .with("variance", json!(images("variance")))
        .with("z", json!(images("zstat")))
        .with("mask", format!("/work/sub-{sub}/mask.nii.gz"))
}

/// Cacheable object carrying an optional identifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestObject {
    pub id: Option<String>,
    pub payload: Vec<i64>,
}

impl TestObject {
    pub fn new(id: Option<&str>) -> Self {
        Self {
            id: id.map(str::to_string),
            payload: vec![1, 2, 3],
        }
    }
}

impl CacheObject for TestObject {
    fn identity(&self) -> Identity<'_> {
        match &self.id {
            Some(id) => Identity::Id(Cow::Borrowed(id)),
            None => Identity::Missing,
        }
    }
}
