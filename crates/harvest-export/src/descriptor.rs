//! Upload destination description and validation

use harvest_core::error::{Error, FieldIssue, Result};
use harvest_core::ServiceLocation;

/// Where an uploaded payload should land.
///
/// Either an explicit file path, or the service coordinates an object key
/// is derived from. A descriptor is validated once per upload, before any
/// target is invoked; an explicit path short-circuits every other rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadDescriptor {
    file_path: Option<String>,
    service_name: Option<String>,
    data_source_name: Option<String>,
    service_location: ServiceLocation,
    site_name: Option<String>,
    filename: Option<String>,
}

impl UploadDescriptor {
    /// Descriptor targeting an explicit path; other fields are not consulted
    pub fn from_path(path: impl Into<String>) -> Self {
        Self {
            file_path: Some(path.into()),
            service_name: None,
            data_source_name: None,
            service_location: ServiceLocation::Global,
            site_name: None,
            filename: None,
        }
    }

    /// Descriptor for a service at the given location
    pub fn for_service(service_name: impl Into<String>, location: ServiceLocation) -> Self {
        Self {
            file_path: None,
            service_name: Some(service_name.into()),
            data_source_name: None,
            service_location: location,
            site_name: None,
            filename: None,
        }
    }

    pub fn with_site_name(mut self, site_name: impl Into<String>) -> Self {
        self.site_name = Some(site_name.into());
        self
    }

    pub fn with_data_source(mut self, data_source_name: impl Into<String>) -> Self {
        self.data_source_name = Some(data_source_name.into());
        self
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn file_path(&self) -> Option<&str> {
        self.file_path.as_deref()
    }

    pub fn service_name(&self) -> Option<&str> {
        self.service_name.as_deref()
    }

    pub fn data_source_name(&self) -> Option<&str> {
        self.data_source_name.as_deref()
    }

    pub fn service_location(&self) -> ServiceLocation {
        self.service_location
    }

    pub fn site_name(&self) -> Option<&str> {
        self.site_name.as_deref()
    }

    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    /// Check the descriptor's invariants, collecting every issue.
    ///
    /// An explicit `file_path` is always valid on its own. Without one,
    /// `service_name` and `data_source_name` are required, and a `site`
    /// location additionally requires `site_name`.
    pub fn validate(&self) -> Result<()> {
        if self.file_path.is_some() {
            return Ok(());
        }

        let mut issues: Vec<FieldIssue> = Vec::new();
        if blank(self.service_name.as_deref()) {
            issues.push(FieldIssue::new(
                "service_name",
                "required when no file_path is given",
            ));
        }
        if blank(self.data_source_name.as_deref()) {
            issues.push(FieldIssue::new(
                "data_source_name",
                "required when no file_path is given",
            ));
        }
        if self.service_location == ServiceLocation::Site && blank(self.site_name.as_deref()) {
            issues.push(FieldIssue::new(
                "site_name",
                "required when service_location is 'site'",
            ));
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(Error::InvalidDescriptor { issues })
        }
    }

    /// Destination path for the payload.
    ///
    /// An explicit `file_path` is returned verbatim. Otherwise the key is
    /// `global/{service}/{data_source}/{filename}` or
    /// `site/{site}/{service}/{data_source}/{filename}` depending on the
    /// location; a descriptor without a pinned filename falls back to
    /// `{data_source}.json`.
    pub fn object_key(&self) -> String {
        if let Some(path) = &self.file_path {
            return path.clone();
        }

        let service = self.service_name.as_deref().unwrap_or_default();
        let data_source = self.data_source_name.as_deref().unwrap_or_default();
        let filename = match &self.filename {
            Some(name) => name.clone(),
            None => format!("{data_source}.json"),
        };

        match self.service_location {
            ServiceLocation::Global => format!("global/{service}/{data_source}/{filename}"),
            ServiceLocation::Site => {
                let site = self.site_name.as_deref().unwrap_or_default();
                format!("site/{site}/{service}/{data_source}/{filename}")
            }
        }
    }
}

fn blank(value: Option<&str>) -> bool {
    value.map_or(true, |text| text.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_path_is_valid_on_its_own() {
        let descriptor = UploadDescriptor::from_path("/x");
        assert!(descriptor.validate().is_ok());
        assert_eq!(descriptor.object_key(), "/x");
    }

    #[test]
    fn site_location_without_site_name_fails_referencing_the_field() {
        let descriptor = UploadDescriptor::for_service("appliance", ServiceLocation::Site)
            .with_data_source("nodes");
        let err = descriptor.validate().unwrap_err();
        match err {
            Error::InvalidDescriptor { issues } => {
                assert!(issues.iter().any(|issue| issue.field == "site_name"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_names_are_all_reported() {
        let descriptor = UploadDescriptor {
            file_path: None,
            service_name: None,
            data_source_name: None,
            service_location: ServiceLocation::Site,
            site_name: None,
            filename: None,
        };
        match descriptor.validate().unwrap_err() {
            Error::InvalidDescriptor { issues } => {
                let fields: Vec<&str> =
                    issues.iter().map(|issue| issue.field.as_str()).collect();
                assert_eq!(
                    fields,
                    vec!["service_name", "data_source_name", "site_name"]
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn global_object_key_layout() {
        let descriptor = UploadDescriptor::for_service("appliance", ServiceLocation::Global)
            .with_data_source("nodes")
            .with_filename("appliance-nodes-2024.json");
        assert!(descriptor.validate().is_ok());
        assert_eq!(
            descriptor.object_key(),
            "global/appliance/nodes/appliance-nodes-2024.json"
        );
    }

    #[test]
    fn site_object_key_includes_the_site_segment() {
        let descriptor = UploadDescriptor::for_service("appliance", ServiceLocation::Site)
            .with_site_name("fra-01")
            .with_data_source("nodes")
            .with_filename("appliance-nodes-2024.json");
        assert!(descriptor.validate().is_ok());
        assert_eq!(
            descriptor.object_key(),
            "site/fra-01/appliance/nodes/appliance-nodes-2024.json"
        );
    }

    #[test]
    fn object_key_falls_back_to_a_stable_filename() {
        let descriptor = UploadDescriptor::for_service("appliance", ServiceLocation::Global)
            .with_data_source("nodes");
        assert_eq!(descriptor.object_key(), "global/appliance/nodes/nodes.json");
    }
}
