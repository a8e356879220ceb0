use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, info};

use crate::constants::{service_name, AGE_GROUPS, OTHER_SERVICES_COLUMN, OTHER_SERVICES_SEPARATOR};
use crate::domain::{CleanResource, FieldValue, RawResource};
use crate::error::{DirectoryError, Result};

/// The cleaned directory: sorted resources plus the reference lists the
/// display layer filters by.
#[derive(Debug, Clone, Serialize)]
pub struct NormalizedDirectory {
    /// Cleaned records, sorted ascending by case-insensitive name.
    pub resources: Vec<CleanResource>,
    /// Fixed age-group labels, independent of the worksheet contents.
    pub unique_age_groups: Vec<String>,
    /// Distinct flag-derived service names, in first-seen order. Names that
    /// only appear in the "Other" free-text column are not included.
    pub unique_services: Vec<String>,
}

/// Trait for normalizing raw worksheet records into a clean directory
pub trait Normalizer {
    fn normalize(&self, records: &[RawResource]) -> Result<NormalizedDirectory>;
}

/// Tracks distinct service names across one normalization pass.
/// Membership is exact text equality; first-seen order is preserved.
struct ServiceRegistry {
    seen: HashSet<String>,
    discovered: Vec<String>,
}

impl ServiceRegistry {
    fn new() -> Self {
        Self {
            seen: HashSet::new(),
            discovered: Vec::new(),
        }
    }

    /// Record a flag-derived service name, ignoring names already seen.
    fn register(&mut self, name: &str) {
        if self.seen.insert(name.to_string()) {
            self.discovered.push(name.to_string());
        }
    }

    fn into_discovered(self) -> Vec<String> {
        self.discovered
    }
}

/// Normalizer for the FACES resource directory worksheet
pub struct DirectoryNormalizer;

impl DirectoryNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Normalize rows still in parsed-JSON form: a JSON array of
    /// column-value row objects, the shape a worksheet export produces.
    pub fn normalize_json(&self, rows: &serde_json::Value) -> Result<NormalizedDirectory> {
        let rows = rows.as_array().ok_or_else(|| {
            DirectoryError::InvalidInput(
                "worksheet export must be a JSON array of row objects".to_string(),
            )
        })?;

        let records = rows
            .iter()
            .map(RawResource::from_value)
            .collect::<Result<Vec<_>>>()?;
        self.normalize(&records)
    }

    /// Normalize a worksheet export still in serialized form.
    pub fn normalize_export(&self, bytes: &[u8]) -> Result<NormalizedDirectory> {
        let rows: serde_json::Value = serde_json::from_slice(bytes)?;
        self.normalize_json(&rows)
    }

    /// Clean one record: copy every column verbatim, derive the services
    /// list, and feed flag-derived names into the registry.
    fn clean_resource(
        &self,
        id: usize,
        raw: &RawResource,
        registry: &mut ServiceRegistry,
    ) -> Result<CleanResource> {
        let mut clean = CleanResource {
            id,
            services: Vec::new(),
            columns: RawResource::new(),
        };

        for (column, value) in raw.iter() {
            clean.columns.insert(column, value.clone());

            if value.is_yes_flag() {
                let service = service_name(column);
                clean.services.push(service.to_string());
                registry.register(service);
            }
        }

        // Some resources list additional services in a free-text column.
        // Those names stay local to the record; they never join the registry.
        match clean.columns.get(OTHER_SERVICES_COLUMN) {
            Some(FieldValue::Text(list)) if !list.is_empty() => {
                let additional = list.split(OTHER_SERVICES_SEPARATOR).map(str::to_string);
                clean.services.extend(additional);
            }
            Some(FieldValue::Number(_)) | Some(FieldValue::Bool(_)) => {
                return Err(DirectoryError::TypeMismatch(format!(
                    "resource {}: \"{}\" must be text",
                    id, OTHER_SERVICES_COLUMN
                )));
            }
            _ => {}
        }

        Ok(clean)
    }
}

impl Normalizer for DirectoryNormalizer {
    fn normalize(&self, records: &[RawResource]) -> Result<NormalizedDirectory> {
        debug!("DirectoryNormalizer: start records={}", records.len());

        let mut registry = ServiceRegistry::new();
        let mut resources = Vec::with_capacity(records.len());
        for (id, raw) in records.iter().enumerate() {
            resources.push(self.clean_resource(id, raw, &mut registry)?);
        }

        // Sort by name, case-insensitively. Every record must carry a text
        // name; keys are computed up front so a bad record fails the whole
        // pass instead of surfacing mid-comparison.
        let mut keyed = Vec::with_capacity(resources.len());
        for resource in resources {
            let key = resource.name()?.to_lowercase();
            keyed.push((key, resource));
        }
        keyed.sort_by(|a, b| a.0.cmp(&b.0));
        let resources: Vec<CleanResource> =
            keyed.into_iter().map(|(_, resource)| resource).collect();

        let unique_services = registry.into_discovered();
        info!(
            "DirectoryNormalizer: cleaned resources={} unique_services={}",
            resources.len(),
            unique_services.len()
        );

        Ok(NormalizedDirectory {
            resources,
            unique_age_groups: AGE_GROUPS.iter().map(|label| label.to_string()).collect(),
            unique_services,
        })
    }
}

impl Default for DirectoryNormalizer {
    fn default() -> Self {
        Self::new()
    }
}
