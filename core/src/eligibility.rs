//! Eligibility Policy: decides whether a guest may book at a property.
//!
//! The policy is a table from restriction category to the set of guest genders that
//! satisfy it. Adding a category means adding a row, never touching call sites.
//!
//! Unrestricted properties accept everyone. A restriction category missing from the
//! table accepts nobody, so a typo in provisioning data fails closed.

use crate::error::BookingError;
use crate::types::{Gender, Property, Restriction};
use std::collections::{HashMap, HashSet};

/// Restriction category for women-only properties
pub const WOMEN_ONLY: &str = "Women Only";

/// Table-driven eligibility rules
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EligibilityPolicy {
    rules: HashMap<String, HashSet<Gender>>,
}

impl EligibilityPolicy {
    /// A policy with no restriction categories; only unrestricted properties are bookable.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// The rule set of the reference deployment: "Women Only" admits female guests.
    #[must_use]
    pub fn standard() -> Self {
        Self::empty().with_rule(WOMEN_ONLY, [Gender::Female])
    }

    /// Adds (or replaces) the genders admitted by a restriction category.
    ///
    /// Category names are matched case-insensitively.
    #[must_use]
    pub fn with_rule(
        mut self,
        category: impl AsRef<str>,
        admitted: impl IntoIterator<Item = Gender>,
    ) -> Self {
        self.rules
            .insert(normalize(category.as_ref()), admitted.into_iter().collect());
        self
    }

    /// Pure eligibility decision.
    #[must_use]
    pub fn is_eligible(&self, property: &Property, guest_gender: Gender) -> bool {
        match &property.restriction {
            Restriction::None => true,
            Restriction::Category(category) => self
                .rules
                .get(&normalize(category))
                .is_some_and(|admitted| admitted.contains(&guest_gender)),
        }
    }

    /// Eligibility decision as a result, for use with `?`.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Eligibility`] naming the property and the category the
    /// guest failed to satisfy.
    pub fn check(&self, property: &Property, guest_gender: Gender) -> Result<(), BookingError> {
        if self.is_eligible(property, guest_gender) {
            Ok(())
        } else {
            Err(BookingError::Eligibility {
                property_id: property.id,
                property_name: property.name.clone(),
                required: property.restriction.as_str().to_string(),
            })
        }
    }
}

impl Default for EligibilityPolicy {
    fn default() -> Self {
        Self::standard()
    }
}

fn normalize(category: &str) -> String {
    category.trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PropertyId;
    use proptest::prelude::*;

    fn property(restriction: Restriction) -> Property {
        Property {
            id: PropertyId::new(1),
            name: "Dr. Anandi Gopal Guest House".to_string(),
            restriction,
        }
    }

    fn any_gender() -> impl Strategy<Value = Gender> {
        prop_oneof![Just(Gender::Male), Just(Gender::Female), Just(Gender::Other)]
    }

    #[test]
    fn test_women_only_admits_female_guests() {
        let policy = EligibilityPolicy::standard();
        let house = property(Restriction::from(WOMEN_ONLY));

        assert!(policy.is_eligible(&house, Gender::Female));
        assert!(!policy.is_eligible(&house, Gender::Male));
        assert!(!policy.is_eligible(&house, Gender::Other));
    }

    #[test]
    fn test_check_reports_property_and_category() {
        let policy = EligibilityPolicy::standard();
        let house = property(Restriction::from(WOMEN_ONLY));

        let error = policy.check(&house, Gender::Male).err();
        assert_eq!(
            error,
            Some(BookingError::Eligibility {
                property_id: PropertyId::new(1),
                property_name: "Dr. Anandi Gopal Guest House".to_string(),
                required: "Women Only".to_string(),
            })
        );
    }

    #[test]
    fn test_unknown_category_fails_closed() {
        let policy = EligibilityPolicy::standard();
        let house = property(Restriction::from("Faculty Only"));

        assert!(!policy.is_eligible(&house, Gender::Female));
        assert!(!policy.is_eligible(&house, Gender::Male));
    }

    #[test]
    fn test_new_category_needs_only_a_rule() {
        let policy = EligibilityPolicy::standard().with_rule("Men Only", [Gender::Male]);
        let house = property(Restriction::from("men only"));

        assert!(policy.is_eligible(&house, Gender::Male));
        assert!(!policy.is_eligible(&house, Gender::Female));
    }

    proptest! {
        #[test]
        fn prop_unrestricted_admits_everyone(gender in any_gender()) {
            let policy = EligibilityPolicy::standard();
            prop_assert!(policy.is_eligible(&property(Restriction::None), gender));
        }

        #[test]
        fn prop_check_agrees_with_is_eligible(gender in any_gender(), restricted in any::<bool>()) {
            let policy = EligibilityPolicy::standard();
            let restriction = if restricted { Restriction::from(WOMEN_ONLY) } else { Restriction::None };
            let house = property(restriction);
            prop_assert_eq!(policy.check(&house, gender).is_ok(), policy.is_eligible(&house, gender));
        }
    }
}
