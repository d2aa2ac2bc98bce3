//! Result model for medical text analysis.
//!
//! Entity and PHI annotations are pass-through structures from the backend;
//! this layer counts and groups them but never interprets their clinical
//! meaning. Everything serializes camelCase with absent fields omitted, so
//! the persisted JSON makes the mode-dependent presence rules visible.

use serde::{Deserialize, Serialize};

use crate::simplify::{SimplifiedEntities, SimplifiedPhi};

/// A trait attached to an entity, e.g. NEGATION or DIAGNOSIS.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityTrait {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

/// A nested attribute of an entity, e.g. the DOSAGE span of a MEDICATION.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityAttribute {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub attribute_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationship_score: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub begin_offset: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_offset: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// A clinical entity span detected in the input text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalEntity {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub begin_offset: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_offset: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Vec<EntityAttribute>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub traits: Option<Vec<EntityTrait>>,
}

/// A protected-health-information span detected in the input text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhiEntity {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub begin_offset: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_offset: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Vec<EntityAttribute>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub traits: Option<Vec<EntityTrait>>,
}

/// Response of one entity-detection backend call.
#[derive(Debug, Clone, Default)]
pub struct EntityDetection {
    pub entities: Vec<MedicalEntity>,
    pub model_version: Option<String>,
}

/// Response of one PHI-detection backend call.
#[derive(Debug, Clone, Default)]
pub struct PhiDetection {
    pub entities: Vec<PhiEntity>,
    pub model_version: Option<String>,
}

/// Summary metadata gathered during one orchestration pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisMetadata {
    pub text_length: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phi_count: Option<usize>,
    /// Wall-clock milliseconds across the backend calls of this pass.
    pub processing_time: u64,
}

/// Merged record of one analysis request.
///
/// Presence rules: `entities` iff the mode included ENTITIES, `phi` iff it
/// included PHI, the simplified views iff the output format asked for them,
/// `output_key` only when persistence ran.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entities: Option<Vec<MedicalEntity>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phi: Option<Vec<PhiEntity>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub simplified_entities: Option<SimplifiedEntities>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub simplified_phi: Option<SimplifiedPhi>,
    pub metadata: AnalysisMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_key: Option<String>,
}

impl AnalysisResult {
    /// Fresh result for input of the given length.
    pub fn new(text_length: usize) -> Self {
        Self {
            metadata: AnalysisMetadata {
                text_length,
                ..Default::default()
            },
            ..Default::default()
        }
    }
}
