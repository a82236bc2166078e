use std::cmp::Ordering;

use tracing::warn;

use shared_models::Patient;

use crate::models::{GenderFilter, SortField, SortOrder, PAGE_SIZE, REGISTRY_LOAD_ERROR};
use crate::services::PatientService;

/// Search, filter, sort and page over the in-memory patient registry.
///
/// The derived view is a pure function of the collection, the query, the
/// gender filter and the sort key; nothing is cached between calls. Changing
/// the query or the filter sends the user back to page 1, changing the sort
/// keeps the current page.
#[derive(Debug, Clone)]
pub struct PatientRegistry {
    patients: Vec<Patient>,
    query: String,
    gender: GenderFilter,
    sort_field: SortField,
    sort_order: SortOrder,
    page: usize,
    loading: bool,
    error: Option<String>,
}

impl Default for PatientRegistry {
    fn default() -> Self {
        Self {
            patients: Vec::new(),
            query: String::new(),
            gender: GenderFilter::All,
            sort_field: SortField::CreatedAt,
            sort_order: SortOrder::Desc,
            page: 1,
            loading: false,
            error: None,
        }
    }
}

impl PatientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_patients(patients: Vec<Patient>) -> Self {
        Self {
            patients,
            ..Self::default()
        }
    }

    /// Fetches the registry. On failure the previous collection is kept and
    /// an inline message is set; calling `load` again is the retry.
    pub async fn load(&mut self, service: &PatientService) {
        self.loading = true;
        self.error = None;

        match service.list_patients().await {
            Ok(patients) => self.patients = patients,
            Err(err) => {
                warn!("Patient registry load failed: {}", err);
                self.error = Some(REGISTRY_LOAD_ERROR.to_string());
            }
        }

        self.loading = false;
    }

    pub fn set_patients(&mut self, patients: Vec<Patient>) {
        self.patients = patients;
    }

    pub fn patients(&self) -> &[Patient] {
        &self.patients
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        if query != self.query {
            self.query = query;
            self.page = 1;
        }
    }

    pub fn gender(&self) -> GenderFilter {
        self.gender
    }

    pub fn set_gender(&mut self, gender: GenderFilter) {
        if gender != self.gender {
            self.gender = gender;
            self.page = 1;
        }
    }

    pub fn sort_key(&self) -> (SortField, SortOrder) {
        (self.sort_field, self.sort_order)
    }

    /// Selecting the active column flips its direction; a new column starts
    /// ascending.
    pub fn sort_by(&mut self, field: SortField) {
        if field == self.sort_field {
            self.sort_order = self.sort_order.toggled();
        } else {
            self.sort_field = field;
            self.sort_order = SortOrder::Asc;
        }
    }

    pub fn set_sort(&mut self, field: SortField, order: SortOrder) {
        self.sort_field = field;
        self.sort_order = order;
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.clamp(1, self.total_pages().max(1));
    }

    pub fn next_page(&mut self) {
        self.set_page(self.page + 1);
    }

    pub fn prev_page(&mut self) {
        self.set_page(self.page.saturating_sub(1));
    }

    pub fn filtered(&self) -> Vec<&Patient> {
        filter_and_sort(
            &self.patients,
            &self.query,
            self.gender,
            self.sort_field,
            self.sort_order,
        )
    }

    pub fn filtered_count(&self) -> usize {
        self.filtered().len()
    }

    pub fn total_count(&self) -> usize {
        self.patients.len()
    }

    pub fn total_pages(&self) -> usize {
        self.filtered_count().div_ceil(PAGE_SIZE)
    }

    /// Patients on the current page. Empty when the page lies past the end.
    pub fn current_page(&self) -> Vec<&Patient> {
        page_window(self.filtered(), self.page)
    }

    /// `All` followed by every gender present in the collection.
    pub fn available_genders(&self) -> Vec<GenderFilter> {
        let mut present: Vec<GenderFilter> = self
            .patients
            .iter()
            .map(|p| GenderFilter::Only(p.gender))
            .collect();
        present.sort_by_key(|g| g.label());
        present.dedup();

        let mut options = vec![GenderFilter::All];
        options.extend(present);
        options
    }
}

pub fn filter_and_sort<'a>(
    patients: &'a [Patient],
    query: &str,
    gender: GenderFilter,
    field: SortField,
    order: SortOrder,
) -> Vec<&'a Patient> {
    let mut result = filter_patients(patients, query, gender);

    // `sort_by` is stable, so equal keys keep their incoming order.
    result.sort_by(|a, b| {
        let ord = compare(a, b, field);
        match order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    });

    result
}

/// Query and gender filtering, preserving the collection's order.
pub fn filter_patients<'a>(
    patients: &'a [Patient],
    query: &str,
    gender: GenderFilter,
) -> Vec<&'a Patient> {
    let needle = query.to_lowercase();

    patients
        .iter()
        .filter(|p| matches_query(p, &needle))
        .filter(|p| gender.admits(p.gender))
        .collect()
}

pub fn page_window<T>(items: Vec<T>, page: usize) -> Vec<T> {
    let start = page.saturating_sub(1).saturating_mul(PAGE_SIZE);
    items.into_iter().skip(start).take(PAGE_SIZE).collect()
}

fn matches_query(patient: &Patient, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    let contains = |field: Option<&str>| {
        field.is_some_and(|value| value.to_lowercase().contains(needle))
    };

    contains(Some(patient.name.as_str()))
        || contains(patient.medical_history.as_deref())
        || contains(patient.contact.as_deref())
}

fn compare(a: &Patient, b: &Patient, field: SortField) -> Ordering {
    match field {
        SortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        SortField::Age => a.age.cmp(&b.age),
        SortField::Gender => a.gender.as_str().cmp(b.gender.as_str()),
        // Missing timestamps sort as the earliest instant.
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;
    use shared_models::Gender;

    fn patient(id: &str, name: &str, age: u32, gender: Gender) -> Patient {
        Patient {
            id: id.to_string(),
            name: name.to_string(),
            age,
            gender,
            contact: None,
            medical_history: None,
            created_at: None,
        }
    }

    fn created(mut p: Patient, day: u32) -> Patient {
        p.created_at = Utc.with_ymd_and_hms(2024, 1, day, 9, 0, 0).single();
        p
    }

    fn ids(patients: &[&Patient]) -> Vec<String> {
        patients.iter().map(|p| p.id.clone()).collect()
    }

    fn fixture() -> Vec<Patient> {
        let mut ana = patient("1", "ana", 30, Gender::Female);
        ana.medical_history = Some("Asthma since childhood".to_string());
        let mut bob = patient("2", "Bob", 45, Gender::Male);
        bob.contact = Some("bob@example.com".to_string());
        vec![
            created(ana, 3),
            created(bob, 1),
            created(patient("3", "Carla", 30, Gender::Female), 2),
            patient("4", "dan", 61, Gender::Other),
        ]
    }

    #[test]
    fn default_sort_is_newest_first() {
        let registry = PatientRegistry::with_patients(fixture());
        assert_eq!(registry.sort_key(), (SortField::CreatedAt, SortOrder::Desc));
        // The patient without a timestamp sorts as the oldest.
        assert_eq!(ids(&registry.filtered()), vec!["1", "3", "2", "4"]);
    }

    #[test]
    fn query_matches_name_history_and_contact_case_insensitively() {
        let mut registry = PatientRegistry::with_patients(fixture());

        registry.set_query("ASTHMA");
        assert_eq!(ids(&registry.filtered()), vec!["1"]);

        registry.set_query("example.com");
        assert_eq!(ids(&registry.filtered()), vec!["2"]);

        registry.set_query("an");
        registry.set_sort(SortField::Name, SortOrder::Asc);
        assert_eq!(ids(&registry.filtered()), vec!["1", "4"]);
    }

    #[test]
    fn names_sort_case_insensitively() {
        let mut registry = PatientRegistry::with_patients(fixture());
        registry.sort_by(SortField::Name);
        assert_eq!(ids(&registry.filtered()), vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn gender_filter_is_exact() {
        let mut registry = PatientRegistry::with_patients(fixture());
        registry.set_gender(GenderFilter::Only(Gender::Female));
        assert_eq!(registry.filtered_count(), 2);
        registry.set_gender(GenderFilter::All);
        assert_eq!(registry.filtered_count(), 4);
    }

    #[test]
    fn equal_ages_keep_relative_order_in_both_directions() {
        let mut registry = PatientRegistry::with_patients(fixture());
        registry.sort_by(SortField::Age);
        assert_eq!(ids(&registry.filtered()), vec!["1", "3", "2", "4"]);
        registry.sort_by(SortField::Age);
        assert_eq!(ids(&registry.filtered()), vec!["4", "2", "1", "3"]);
    }

    #[test]
    fn sort_toggle_and_reset() {
        let mut registry = PatientRegistry::new();
        assert_eq!(registry.sort_key(), (SortField::CreatedAt, SortOrder::Desc));

        registry.sort_by(SortField::Name);
        assert_eq!(registry.sort_key(), (SortField::Name, SortOrder::Asc));

        registry.sort_by(SortField::Name);
        assert_eq!(registry.sort_key(), (SortField::Name, SortOrder::Desc));

        registry.sort_by(SortField::Age);
        assert_eq!(registry.sort_key(), (SortField::Age, SortOrder::Asc));
    }

    #[test]
    fn query_and_filter_changes_reset_page_but_sort_does_not() {
        let patients: Vec<Patient> = (0..35)
            .map(|i| patient(&i.to_string(), &format!("Patient {}", i), 20 + i, Gender::Male))
            .collect();
        let mut registry = PatientRegistry::with_patients(patients);
        assert_eq!(registry.total_pages(), 4);

        registry.set_page(3);
        registry.sort_by(SortField::Age);
        assert_eq!(registry.page(), 3);

        registry.set_query("Patient");
        assert_eq!(registry.page(), 1);

        registry.set_page(2);
        registry.set_gender(GenderFilter::Only(Gender::Male));
        assert_eq!(registry.page(), 1);
    }

    #[test]
    fn page_navigation_is_clamped() {
        let patients: Vec<Patient> = (0..12)
            .map(|i| patient(&i.to_string(), "P", i, Gender::Other))
            .collect();
        let mut registry = PatientRegistry::with_patients(patients);

        registry.prev_page();
        assert_eq!(registry.page(), 1);
        registry.next_page();
        registry.next_page();
        assert_eq!(registry.page(), 2);
        assert_eq!(registry.current_page().len(), 2);
    }

    #[test]
    fn available_genders_start_with_all() {
        let registry = PatientRegistry::with_patients(fixture());
        let labels: Vec<_> = registry
            .available_genders()
            .iter()
            .map(|g| g.label())
            .collect();
        assert_eq!(labels, vec!["All", "female", "male", "other"]);
    }

    fn arb_patient() -> impl Strategy<Value = Patient> {
        (
            "[a-cA-C]{0,3}",
            0u32..5,
            prop_oneof![Just(Gender::Male), Just(Gender::Female), Just(Gender::Other)],
            proptest::option::of("[a-c]{0,3}"),
            proptest::option::of(1u32..5),
        )
            .prop_map(|(name, age, gender, history, day)| Patient {
                id: String::new(),
                name,
                age,
                gender,
                contact: None,
                medical_history: history,
                created_at: day.and_then(|d| Utc.with_ymd_and_hms(2024, 2, d, 0, 0, 0).single()),
            })
    }

    fn arb_collection() -> impl Strategy<Value = Vec<Patient>> {
        proptest::collection::vec(arb_patient(), 0..40).prop_map(|mut patients| {
            for (i, p) in patients.iter_mut().enumerate() {
                p.id = i.to_string();
            }
            patients
        })
    }

    fn arb_gender_filter() -> impl Strategy<Value = GenderFilter> {
        prop_oneof![
            Just(GenderFilter::All),
            Just(GenderFilter::Only(Gender::Male)),
            Just(GenderFilter::Only(Gender::Female)),
            Just(GenderFilter::Only(Gender::Other)),
        ]
    }

    fn arb_sort() -> impl Strategy<Value = (SortField, SortOrder)> {
        (
            prop_oneof![
                Just(SortField::Name),
                Just(SortField::Age),
                Just(SortField::Gender),
                Just(SortField::CreatedAt),
            ],
            prop_oneof![Just(SortOrder::Asc), Just(SortOrder::Desc)],
        )
    }

    proptest! {
        /// Concatenating every page yields the filtered, sorted list exactly once.
        #[test]
        fn pages_partition_the_filtered_result(
            patients in arb_collection(),
            query in "[a-c]{0,2}",
            gender in arb_gender_filter(),
            (field, order) in arb_sort(),
        ) {
            let mut registry = PatientRegistry::with_patients(patients);
            registry.set_query(query);
            registry.set_gender(gender);
            registry.set_sort(field, order);

            let full = ids(&registry.filtered());
            let mut joined = Vec::new();
            for page in 1..=registry.total_pages() {
                registry.set_page(page);
                let window = ids(&registry.current_page());
                prop_assert!(window.len() <= PAGE_SIZE);
                joined.extend(window);
            }
            prop_assert_eq!(joined, full);
        }

        /// Filters only ever remove; the neutral filter is the identity.
        #[test]
        fn filtering_is_a_refinement(
            patients in arb_collection(),
            query in "[a-c]{0,2}",
            gender in arb_gender_filter(),
        ) {
            let all_ids: Vec<String> = patients.iter().map(|p| p.id.clone()).collect();
            let filtered = filter_patients(&patients, &query, gender);
            for p in &filtered {
                prop_assert!(all_ids.contains(&p.id));
            }

            let neutral = filter_patients(&patients, "", GenderFilter::All);
            prop_assert_eq!(ids(&neutral), all_ids);
        }

        /// Equal sort keys keep their relative input order.
        #[test]
        fn sort_is_stable(
            patients in arb_collection(),
            (field, order) in arb_sort(),
        ) {
            let sorted = filter_and_sort(&patients, "", GenderFilter::All, field, order);
            for pair in sorted.windows(2) {
                if compare(pair[0], pair[1], field) == Ordering::Equal {
                    let first: usize = pair[0].id.parse().unwrap();
                    let second: usize = pair[1].id.parse().unwrap();
                    prop_assert!(first < second);
                }
            }
        }

        /// Identical inputs always give the identical window.
        #[test]
        fn view_is_deterministic(
            patients in arb_collection(),
            query in "[a-c]{0,2}",
            (field, order) in arb_sort(),
            page in 1usize..5,
        ) {
            let first = page_window(
                filter_and_sort(&patients, &query, GenderFilter::All, field, order),
                page,
            );
            let second = page_window(
                filter_and_sort(&patients, &query, GenderFilter::All, field, order),
                page,
            );
            prop_assert_eq!(ids(&first), ids(&second));
        }
    }
}
