use serde::{Deserialize, Serialize};
use sqlx::Type;
use std::str::FromStr;
use utoipa::ToSchema;

/// Organizational unit owning portal content, matching the `office` database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "office")]
pub enum Office {
    #[serde(rename = "Admissions Office")]
    #[sqlx(rename = "Admissions Office")]
    AdmissionsOffice,
    #[serde(rename = "Library Office")]
    #[sqlx(rename = "Library Office")]
    LibraryOffice,
    #[serde(rename = "Examinations Office")]
    #[sqlx(rename = "Examinations Office")]
    ExaminationsOffice,
    #[serde(rename = "Academic Office")]
    #[sqlx(rename = "Academic Office")]
    AcademicOffice,
    #[serde(rename = "Student Affairs Office")]
    #[sqlx(rename = "Student Affairs Office")]
    StudentAffairsOffice,
    #[serde(rename = "Mess Office")]
    #[sqlx(rename = "Mess Office")]
    MessOffice,
    #[serde(rename = "Hostel Office")]
    #[sqlx(rename = "Hostel Office")]
    HostelOffice,
    #[serde(rename = "Alumni Cell")]
    #[sqlx(rename = "Alumni Cell")]
    AlumniCell,
    #[serde(rename = "Faculty Portal")]
    #[sqlx(rename = "Faculty Portal")]
    FacultyPortal,
    #[serde(rename = "Placement Cell")]
    #[sqlx(rename = "Placement Cell")]
    PlacementCell,
    #[serde(rename = "Outreach Office")]
    #[sqlx(rename = "Outreach Office")]
    OutreachOffice,
    #[serde(rename = "Statistical Cell")]
    #[sqlx(rename = "Statistical Cell")]
    StatisticalCell,
    #[serde(rename = "R&D Office")]
    #[sqlx(rename = "R&D Office")]
    ResearchAndDevelopmentOffice,
    #[serde(rename = "General Administration")]
    #[sqlx(rename = "General Administration")]
    GeneralAdministration,
    #[serde(rename = "Accounts Office")]
    #[sqlx(rename = "Accounts Office")]
    AccountsOffice,
    #[serde(rename = "IT Services Office")]
    #[sqlx(rename = "IT Services Office")]
    ItServicesOffice,
    #[serde(rename = "Communication Office")]
    #[sqlx(rename = "Communication Office")]
    CommunicationOffice,
    #[serde(rename = "Engineering Office")]
    #[sqlx(rename = "Engineering Office")]
    EngineeringOffice,
    #[serde(rename = "HR & Personnel")]
    #[sqlx(rename = "HR & Personnel")]
    HrAndPersonnel,
}

impl Office {
    pub const ALL: [Office; 19] = [
        Office::AdmissionsOffice,
        Office::LibraryOffice,
        Office::ExaminationsOffice,
        Office::AcademicOffice,
        Office::StudentAffairsOffice,
        Office::MessOffice,
        Office::HostelOffice,
        Office::AlumniCell,
        Office::FacultyPortal,
        Office::PlacementCell,
        Office::OutreachOffice,
        Office::StatisticalCell,
        Office::ResearchAndDevelopmentOffice,
        Office::GeneralAdministration,
        Office::AccountsOffice,
        Office::ItServicesOffice,
        Office::CommunicationOffice,
        Office::EngineeringOffice,
        Office::HrAndPersonnel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Office::AdmissionsOffice => "Admissions Office",
            Office::LibraryOffice => "Library Office",
            Office::ExaminationsOffice => "Examinations Office",
            Office::AcademicOffice => "Academic Office",
            Office::StudentAffairsOffice => "Student Affairs Office",
            Office::MessOffice => "Mess Office",
            Office::HostelOffice => "Hostel Office",
            Office::AlumniCell => "Alumni Cell",
            Office::FacultyPortal => "Faculty Portal",
            Office::PlacementCell => "Placement Cell",
            Office::OutreachOffice => "Outreach Office",
            Office::StatisticalCell => "Statistical Cell",
            Office::ResearchAndDevelopmentOffice => "R&D Office",
            Office::GeneralAdministration => "General Administration",
            Office::AccountsOffice => "Accounts Office",
            Office::ItServicesOffice => "IT Services Office",
            Office::CommunicationOffice => "Communication Office",
            Office::EngineeringOffice => "Engineering Office",
            Office::HrAndPersonnel => "HR & Personnel",
        }
    }
}

impl std::fmt::Display for Office {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Office {
    /// Parse a path or form value, answering 400 for unknown offices
    pub fn parse_param(value: &str) -> crate::core::error::Result<Office> {
        value
            .parse()
            .map_err(crate::core::error::AppError::BadRequest)
    }
}

impl FromStr for Office {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Office::ALL
            .iter()
            .copied()
            .find(|office| office.as_str() == trimmed)
            .ok_or_else(|| format!("Unknown office: {}", trimmed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_office_round_trips_through_display_names() {
        for office in Office::ALL {
            assert_eq!(office.as_str().parse::<Office>(), Ok(office));
        }
    }

    #[test]
    fn test_office_serde_uses_display_name() {
        let json = serde_json::to_string(&Office::ResearchAndDevelopmentOffice).unwrap();
        assert_eq!(json, "\"R&D Office\"");

        let office: Office = serde_json::from_str("\"HR & Personnel\"").unwrap();
        assert_eq!(office, Office::HrAndPersonnel);
    }

    #[test]
    fn test_unknown_office_is_rejected() {
        assert!("Administration".parse::<Office>().is_err());
        assert!(matches!(
            Office::parse_param("Administration"),
            Err(crate::core::error::AppError::BadRequest(_))
        ));
        assert_eq!(Office::parse_param(" Mess Office ").unwrap(), Office::MessOffice);
        assert!(serde_json::from_str::<Office>("\"Administration\"").is_err());
    }
}
