use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::{AsRefStr, Display, EnumString};

/// Field keys used inside a [`Submission`] and in stored ad records.
pub mod fields {
    pub const ROLE: &str = "role";
    pub const REGION: &str = "region";
    pub const GENDER: &str = "gender";
    pub const FULL_NAME: &str = "full_name";
    pub const AGE: &str = "age";
    pub const SKILL: &str = "skill";
    pub const RESPONSIBILITY: &str = "responsibility";
    pub const WORK_HOURS: &str = "work_hours";
    pub const FREE_TIME: &str = "free_time";
    pub const EXTRA_NOTES: &str = "extra_notes";
    pub const SALARY_EXPECTATION: &str = "salary_expectation";
    pub const PHONE: &str = "phone";
    pub const VIDEO_REF: &str = "video_ref";
    pub const AGE_RANGE: &str = "age_range";
    pub const REQUIREMENTS: &str = "requirements";
    pub const SALARY_OFFER: &str = "salary_offer";
    pub const CODE: &str = "code";
}

/// Name stored in `full_name` for employer ads; employers are never asked for one.
pub const EMPLOYER_NAME: &str = "Ish beruvchi";

/// Who is placing the ad
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum Role {
    /// Looking for a job
    Seeker,
    /// Looking for a worker
    Employer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Human-readable label used in ad texts
    pub fn label(self) -> &'static str {
        match self {
            Gender::Male => "Erkak",
            Gender::Female => "Ayol",
        }
    }
}

const COMMON_FIELDS: &[&str] = &[fields::ROLE, fields::REGION, fields::GENDER];

const SEEKER_FIELDS: &[&str] = &[
    fields::FULL_NAME,
    fields::AGE,
    fields::SKILL,
    fields::RESPONSIBILITY,
    fields::WORK_HOURS,
    fields::FREE_TIME,
    fields::EXTRA_NOTES,
    fields::SALARY_EXPECTATION,
    fields::PHONE,
];

const EMPLOYER_FIELDS: &[&str] = &[
    fields::FULL_NAME,
    fields::AGE_RANGE,
    fields::REQUIREMENTS,
    fields::WORK_HOURS,
    fields::EXTRA_NOTES,
    fields::SALARY_OFFER,
    fields::PHONE,
];

/// Every field a finished submission of `role` must carry.
pub fn required_fields(role: Role) -> Vec<&'static str> {
    let branch = match role {
        Role::Seeker => SEEKER_FIELDS,
        Role::Employer => EMPLOYER_FIELDS,
    };
    COMMON_FIELDS.iter().chain(branch.iter()).copied().collect()
}

/// Fields a submission of `role` may carry beyond the required ones.
pub fn optional_fields(role: Role) -> &'static [&'static str] {
    match role {
        Role::Seeker => &[fields::VIDEO_REF, fields::CODE],
        Role::Employer => &[fields::CODE],
    }
}

/// Form answers for one ad, keyed by field name.
///
/// Serializes as a flat JSON object, which is also the stored ad record shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Submission {
    fields: BTreeMap<String, String>,
}

impl Submission {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.fields.insert(key.to_string(), value.into());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn role(&self) -> Option<Role> {
        self.get(fields::ROLE).and_then(|r| r.parse().ok())
    }

    pub fn gender(&self) -> Option<Gender> {
        self.get(fields::GENDER).and_then(|g| g.parse().ok())
    }

    pub fn code(&self) -> Option<&str> {
        self.get(fields::CODE)
    }

    /// Copy of this submission with the permanent code attached.
    pub fn with_code(&self, code: &str) -> Submission {
        let mut record = self.clone();
        record.set(fields::CODE, code);
        record
    }

    /// Required fields that are still absent. An unknown role reports `role` itself.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        match self.role() {
            Some(role) => required_fields(role).into_iter().filter(|key| !self.contains(key)).collect(),
            None => vec![fields::ROLE],
        }
    }

    /// Fields present that belong to neither the required nor the optional set of the role.
    pub fn foreign_fields(&self) -> Vec<String> {
        let Some(role) = self.role() else {
            return Vec::new();
        };
        let required = required_fields(role);
        let optional = optional_fields(role);
        self.keys()
            .filter(|key| !required.iter().chain(optional.iter()).any(|known| known == key))
            .map(str::to_string)
            .collect()
    }

    /// True when every required field is present and nothing from the other branch leaked in.
    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty() && self.foreign_fields().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_and_gender_round_trip_through_strum() {
        assert_eq!(Role::Seeker.to_string(), "seeker");
        assert_eq!("employer".parse::<Role>().unwrap(), Role::Employer);
        assert_eq!(Gender::Female.as_ref(), "female");
        assert_eq!(Gender::Male.label(), "Erkak");
        assert!("boss".parse::<Role>().is_err());
    }

    #[test]
    fn test_required_fields_differ_by_branch() {
        let seeker = required_fields(Role::Seeker);
        let employer = required_fields(Role::Employer);

        assert!(seeker.contains(&fields::RESPONSIBILITY));
        assert!(seeker.contains(&fields::FREE_TIME));
        assert!(!employer.contains(&fields::RESPONSIBILITY));
        assert!(!employer.contains(&fields::FREE_TIME));
        assert!(employer.contains(&fields::AGE_RANGE));
        assert!(employer.contains(&fields::FULL_NAME));
    }

    #[test]
    fn test_missing_and_foreign_fields() {
        let mut sub = Submission::new();
        assert_eq!(sub.missing_fields(), vec![fields::ROLE]);

        sub.set(fields::ROLE, "employer");
        sub.set(fields::FREE_TIME, "weekends");
        assert!(sub.missing_fields().contains(&fields::SALARY_OFFER));
        assert_eq!(sub.foreign_fields(), vec![fields::FREE_TIME.to_string()]);
        assert!(!sub.is_complete());
    }

    #[test]
    fn test_with_code_leaves_original_untouched() {
        let mut sub = Submission::new();
        sub.set(fields::REGION, "Samarqand");

        let record = sub.with_code("E-00042");
        assert_eq!(record.code(), Some("E-00042"));
        assert_eq!(sub.code(), None);
    }
}
