//! Simplified output views derived from the raw annotation lists.
//!
//! The raw backend annotations are grouped into flat, category-oriented
//! structures that downstream consumers can read without knowing the
//! attribute/trait nesting: medications with their dosage spans pulled up,
//! test results with value and unit, PHI grouped by kind. Derivation is
//! pure and makes no backend calls.

use serde::{Deserialize, Serialize};

use crate::config::OutputFormat;
use crate::models::{AnalysisResult, EntityAttribute, EntityTrait, MedicalEntity, PhiEntity};

/// A trait carried into a simplified view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimplifiedTrait {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

/// An attribute carried into a simplified view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimplifiedAttribute {
    #[serde(rename = "type")]
    pub attribute_type: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

/// A medication with its dosage-related attributes promoted to fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimplifiedMedication {
    pub name: String,
    pub confidence: f32,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub begin_offset: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_offset: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dosage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strength: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub traits: Option<Vec<SimplifiedTrait>>,
}

/// A condition, procedure, or anatomy span with attributes kept as a list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimplifiedSpan {
    pub name: String,
    pub confidence: f32,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub begin_offset: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_offset: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Vec<SimplifiedAttribute>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub traits: Option<Vec<SimplifiedTrait>>,
}

/// A test result with its value and unit attributes promoted to fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimplifiedTestResult {
    pub name: String,
    pub confidence: f32,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub begin_offset: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_offset: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_score: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_score: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_attributes: Option<Vec<SimplifiedAttribute>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub traits: Option<Vec<SimplifiedTrait>>,
}

/// Clinical entities grouped by category. Empty groups are omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimplifiedEntities {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medications: Option<Vec<SimplifiedMedication>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Vec<SimplifiedSpan>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_results: Option<Vec<SimplifiedTestResult>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub procedures: Option<Vec<SimplifiedSpan>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anatomy: Option<Vec<SimplifiedSpan>>,
}

/// One PHI span in a simplified group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimplifiedPhiItem {
    pub text: String,
    #[serde(rename = "type")]
    pub entity_type: String,
    pub confidence: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub begin_offset: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_offset: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_date: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_age: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_profession: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unknown_type: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub traits: Option<Vec<SimplifiedTrait>>,
}

/// PHI spans grouped by kind. Empty groups are omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimplifiedPhi {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub names: Option<Vec<SimplifiedPhiItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dates: Option<Vec<SimplifiedPhiItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locations: Option<Vec<SimplifiedPhiItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifiers: Option<Vec<SimplifiedPhiItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<Vec<SimplifiedPhiItem>>,
}

/// Populate the simplified views on `result` when the output format asks
/// for them. Views are derived only for annotation lists the orchestration
/// actually produced.
pub fn apply(result: &mut AnalysisResult, format: OutputFormat) {
    if !format.includes_simplified() {
        return;
    }
    if let Some(entities) = &result.entities {
        result.simplified_entities = Some(simplify_entities(entities));
    }
    if let Some(phi) = &result.phi {
        result.simplified_phi = Some(simplify_phi(phi));
    }
}

fn simplified_traits(traits: &Option<Vec<EntityTrait>>) -> Option<Vec<SimplifiedTrait>> {
    let traits = traits.as_ref()?;
    let mapped: Vec<SimplifiedTrait> = traits
        .iter()
        .filter_map(|t| {
            t.name.as_ref().map(|name| SimplifiedTrait {
                name: name.clone(),
                score: t.score,
            })
        })
        .collect();
    if mapped.is_empty() {
        None
    } else {
        Some(mapped)
    }
}

fn simplified_attributes(
    attributes: &[EntityAttribute],
    skip_types: &[&str],
) -> Option<Vec<SimplifiedAttribute>> {
    let mapped: Vec<SimplifiedAttribute> = attributes
        .iter()
        .filter(|a| {
            a.attribute_type
                .as_deref()
                .map(|t| !skip_types.contains(&t))
                .unwrap_or(false)
        })
        .filter_map(|a| {
            Some(SimplifiedAttribute {
                attribute_type: a.attribute_type.clone()?,
                text: a.text.clone()?,
                score: a.score,
            })
        })
        .collect();
    if mapped.is_empty() {
        None
    } else {
        Some(mapped)
    }
}

fn attribute_text(attributes: &[EntityAttribute], attribute_type: &str) -> Option<String> {
    attributes
        .iter()
        .find(|a| a.attribute_type.as_deref() == Some(attribute_type))
        .and_then(|a| a.text.clone())
}

fn attribute_score(attributes: &[EntityAttribute], attribute_type: &str) -> Option<f32> {
    attributes
        .iter()
        .find(|a| a.attribute_type.as_deref() == Some(attribute_type))
        .and_then(|a| a.score)
}

fn entity_name(entity: &MedicalEntity) -> String {
    entity.text.clone().unwrap_or_default()
}

fn span_view(entity: &MedicalEntity) -> SimplifiedSpan {
    let attributes = entity.attributes.as_deref().unwrap_or(&[]);
    SimplifiedSpan {
        name: entity_name(entity),
        confidence: entity.score.unwrap_or_default(),
        entity_type: entity.entity_type.clone(),
        category: entity.category.clone(),
        begin_offset: entity.begin_offset,
        end_offset: entity.end_offset,
        attributes: simplified_attributes(attributes, &[]),
        traits: simplified_traits(&entity.traits),
    }
}

/// Group raw clinical entities into category-oriented views.
pub fn simplify_entities(entities: &[MedicalEntity]) -> SimplifiedEntities {
    let mut views = SimplifiedEntities::default();

    for entity in entities {
        match entity.category.as_deref() {
            Some("MEDICATION") => {
                let attributes = entity.attributes.as_deref().unwrap_or(&[]);
                views
                    .medications
                    .get_or_insert_with(Vec::new)
                    .push(SimplifiedMedication {
                        name: entity_name(entity),
                        confidence: entity.score.unwrap_or_default(),
                        entity_type: entity.entity_type.clone(),
                        category: entity.category.clone(),
                        begin_offset: entity.begin_offset,
                        end_offset: entity.end_offset,
                        dosage: attribute_text(attributes, "DOSAGE"),
                        frequency: attribute_text(attributes, "FREQUENCY"),
                        strength: attribute_text(attributes, "STRENGTH"),
                        route: attribute_text(attributes, "ROUTE_OR_MODE"),
                        duration: attribute_text(attributes, "DURATION"),
                        form: attribute_text(attributes, "FORM"),
                        rate: attribute_text(attributes, "RATE"),
                        traits: simplified_traits(&entity.traits),
                    });
            }
            Some("MEDICAL_CONDITION") => {
                views
                    .conditions
                    .get_or_insert_with(Vec::new)
                    .push(span_view(entity));
            }
            Some("TEST_TREATMENT_PROCEDURE") => {
                if entity.entity_type.as_deref() == Some("TEST_NAME") {
                    let attributes = entity.attributes.as_deref().unwrap_or(&[]);
                    views
                        .test_results
                        .get_or_insert_with(Vec::new)
                        .push(SimplifiedTestResult {
                            name: entity_name(entity),
                            confidence: entity.score.unwrap_or_default(),
                            entity_type: entity.entity_type.clone(),
                            category: entity.category.clone(),
                            begin_offset: entity.begin_offset,
                            end_offset: entity.end_offset,
                            value: attribute_text(attributes, "TEST_VALUE"),
                            value_score: attribute_score(attributes, "TEST_VALUE"),
                            unit: attribute_text(attributes, "TEST_UNIT"),
                            unit_score: attribute_score(attributes, "TEST_UNIT"),
                            other_attributes: simplified_attributes(
                                attributes,
                                &["TEST_VALUE", "TEST_UNIT"],
                            ),
                            traits: simplified_traits(&entity.traits),
                        });
                } else {
                    views
                        .procedures
                        .get_or_insert_with(Vec::new)
                        .push(span_view(entity));
                }
            }
            Some("ANATOMY") => {
                views
                    .anatomy
                    .get_or_insert_with(Vec::new)
                    .push(span_view(entity));
            }
            _ => {}
        }
    }

    views
}

/// Group raw PHI spans by kind.
pub fn simplify_phi(phi: &[PhiEntity]) -> SimplifiedPhi {
    let mut views = SimplifiedPhi::default();

    for entity in phi {
        let entity_type = entity.entity_type.clone().unwrap_or_default();
        let mut item = SimplifiedPhiItem {
            text: entity.text.clone().unwrap_or_default(),
            entity_type: entity_type.clone(),
            confidence: entity.score.unwrap_or_default(),
            begin_offset: entity.begin_offset,
            end_offset: entity.end_offset,
            category: entity.category.clone(),
            traits: simplified_traits(&entity.traits),
            ..Default::default()
        };

        match entity_type.as_str() {
            "NAME" => views.names.get_or_insert_with(Vec::new).push(item),
            "DATE" => {
                item.is_date = Some(true);
                views.dates.get_or_insert_with(Vec::new).push(item);
            }
            "AGE" => {
                item.is_age = Some(true);
                views.dates.get_or_insert_with(Vec::new).push(item);
            }
            "ADDRESS" => views.locations.get_or_insert_with(Vec::new).push(item),
            "PHONE_OR_FAX" | "EMAIL" => {
                item.contact_type = Some(entity_type.clone());
                views.contact.get_or_insert_with(Vec::new).push(item);
            }
            "ID" => views.identifiers.get_or_insert_with(Vec::new).push(item),
            "PROFESSION" => {
                item.is_profession = Some(true);
                views.identifiers.get_or_insert_with(Vec::new).push(item);
            }
            _ => {
                item.unknown_type = Some(true);
                views.identifiers.get_or_insert_with(Vec::new).push(item);
            }
        }
    }

    views
}
