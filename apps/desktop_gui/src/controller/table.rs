//! Client-side table model: display formatting, sorting, species filter, pagination.
//!
//! Everything here works over the in-memory snapshot; nothing is sent to the
//! entity store for sort, filter, or page state.

use std::{
    cmp::Ordering,
    collections::{BTreeSet, HashSet},
};

use chrono::Datelike;
use feruca::Collator;
use shared::domain::{Animal, AnimalId, HealthStatus};

use crate::controller::form::parse_calendar_date;

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const PAGE_SIZE_OPTIONS: [usize; 4] = [10, 20, 50, 100];
pub const UNKNOWN_LABEL: &str = "Unknown";
pub const INVALID_DATE_LABEL: &str = "Invalid Date";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Name,
    Age,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortState {
    pub column: Option<(SortColumn, SortDirection)>,
}

impl SortState {
    /// Header click cycle: ascending, descending, unsorted.
    pub fn toggle(&mut self, column: SortColumn) {
        self.column = match self.column {
            Some((current, SortDirection::Ascending)) if current == column => {
                Some((column, SortDirection::Descending))
            }
            Some((current, SortDirection::Descending)) if current == column => None,
            _ => Some((column, SortDirection::Ascending)),
        };
    }

    pub fn direction_for(&self, column: SortColumn) -> Option<SortDirection> {
        match self.column {
            Some((current, direction)) if current == column => Some(direction),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagColor {
    Green,
    Orange,
    Red,
    Blue,
}

pub fn health_tag_color(health: Option<&str>) -> TagColor {
    match health.and_then(HealthStatus::parse) {
        Some(HealthStatus::Healthy) => TagColor::Green,
        Some(HealthStatus::Sick) => TagColor::Orange,
        Some(HealthStatus::Injured) => TagColor::Red,
        Some(HealthStatus::Unknown) | None => TagColor::Blue,
    }
}

pub fn health_label(health: Option<&str>) -> String {
    match health {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => UNKNOWN_LABEL.to_string(),
    }
}

/// Zero counts as unknown, matching the falsy check of the source data.
pub fn format_age(age: Option<f64>) -> String {
    match age {
        Some(value) if value != 0.0 && !value.is_nan() => format!("{value} years"),
        _ => UNKNOWN_LABEL.to_string(),
    }
}

/// Renders `M/D/YYYY`.
pub fn format_last_seen(last_seen: Option<&str>) -> String {
    match last_seen {
        None => UNKNOWN_LABEL.to_string(),
        Some(raw) if raw.is_empty() => UNKNOWN_LABEL.to_string(),
        Some(raw) => match parse_calendar_date(raw) {
            Some(date) => format!("{}/{}/{}", date.month(), date.day(), date.year()),
            None => INVALID_DATE_LABEL.to_string(),
        },
    }
}

/// Unicode collation (CLDR root order): accents and case only break ties,
/// and lowercase sorts before uppercase.
pub fn compare_names(collator: &mut Collator, left: &str, right: &str) -> Ordering {
    collator.collate(left, right)
}

fn compare_ages(left: Option<f64>, right: Option<f64>) -> Ordering {
    let left = left.filter(|value| !value.is_nan()).unwrap_or(0.0);
    let right = right.filter(|value| !value.is_nan()).unwrap_or(0.0);
    left.partial_cmp(&right).unwrap_or(Ordering::Equal)
}

/// Distinct species in first-appearance order.
pub fn species_filter_options(animals: &[Animal]) -> Vec<String> {
    let mut seen = HashSet::new();
    animals
        .iter()
        .filter(|animal| seen.insert(animal.species.as_str()))
        .map(|animal| animal.species.clone())
        .collect()
}

/// Display projection of one record.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimalRow {
    pub id: AnimalId,
    pub name: String,
    pub species: String,
    pub breed: String,
    pub age: String,
    pub health: String,
    pub health_color: TagColor,
    pub location: String,
    pub last_seen: String,
}

impl AnimalRow {
    pub fn from_animal(animal: &Animal) -> Self {
        Self {
            id: animal.id.clone(),
            name: animal.name.clone(),
            species: animal.species.clone(),
            breed: animal.breed.clone().unwrap_or_default(),
            age: format_age(animal.age),
            health: health_label(animal.health.as_deref()),
            health_color: health_tag_color(animal.health.as_deref()),
            location: animal.location.clone().unwrap_or_default(),
            last_seen: format_last_seen(animal.last_seen.as_deref()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TablePage {
    pub rows: Vec<AnimalRow>,
    /// Indices into the source collection, parallel to `rows`.
    pub source_indices: Vec<usize>,
    /// Row count after filtering, before paging.
    pub total: usize,
    pub page: usize,
    pub page_count: usize,
    pub page_size: usize,
}

impl TablePage {
    pub fn summary(&self) -> String {
        if self.total == 0 {
            return "0 items".to_string();
        }
        let start = (self.page - 1) * self.page_size + 1;
        let end = (start + self.rows.len()).saturating_sub(1);
        format!("{start}-{end} of {} items", self.total)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableState {
    sort: SortState,
    species_filter: BTreeSet<String>,
    page: usize,
    page_size: usize,
}

impl Default for TableState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl TableState {
    pub fn new(page_size: usize) -> Self {
        Self {
            sort: SortState::default(),
            species_filter: BTreeSet::new(),
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn sort(&self) -> SortState {
        self.sort
    }

    pub fn toggle_sort(&mut self, column: SortColumn) {
        self.sort.toggle(column);
    }

    pub fn species_filter(&self) -> &BTreeSet<String> {
        &self.species_filter
    }

    pub fn is_species_selected(&self, species: &str) -> bool {
        self.species_filter.contains(species)
    }

    pub fn toggle_species(&mut self, species: &str) {
        if !self.species_filter.remove(species) {
            self.species_filter.insert(species.to_string());
        }
        self.page = 1;
    }

    pub fn set_species_filter<I, S>(&mut self, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.species_filter = values.into_iter().map(Into::into).collect();
        self.page = 1;
    }

    pub fn clear_species_filter(&mut self) {
        self.species_filter.clear();
        self.page = 1;
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
    }

    /// Moves to `page`; the next [`TableState::view`] clamps it into range.
    pub fn jump_to(&mut self, page: usize) {
        self.page = page.max(1);
    }

    pub fn next_page(&mut self) {
        self.page = self.page.saturating_add(1);
    }

    pub fn previous_page(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }

    fn matches_filter(&self, animal: &Animal) -> bool {
        self.species_filter.is_empty() || self.species_filter.contains(&animal.species)
    }

    /// Filtered and sorted indices into `animals`. The sort is stable, so the
    /// unsorted order is the load order.
    pub fn ordered_indices(&self, animals: &[Animal]) -> Vec<usize> {
        let mut indices: Vec<usize> = animals
            .iter()
            .enumerate()
            .filter(|(_, animal)| self.matches_filter(animal))
            .map(|(index, _)| index)
            .collect();

        if let Some((column, direction)) = self.sort.column {
            let mut collator = Collator::default();
            indices.sort_by(|&lhs, &rhs| {
                let left = &animals[lhs];
                let right = &animals[rhs];
                let ordering = match column {
                    SortColumn::Name => compare_names(&mut collator, &left.name, &right.name),
                    SortColumn::Age => compare_ages(left.age, right.age),
                };
                match direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                }
            });
        }

        indices
    }

    /// Builds the visible page, clamping the stored page into range first.
    pub fn view(&mut self, animals: &[Animal]) -> TablePage {
        let indices = self.ordered_indices(animals);
        let total = indices.len();
        let page_count = total.div_ceil(self.page_size).max(1);
        self.page = self.page.clamp(1, page_count);

        let source_indices: Vec<usize> = indices
            .into_iter()
            .skip((self.page - 1) * self.page_size)
            .take(self.page_size)
            .collect();
        let rows = source_indices
            .iter()
            .map(|&index| AnimalRow::from_animal(&animals[index]))
            .collect();

        TablePage {
            rows,
            source_indices,
            total,
            page: self.page,
            page_count,
            page_size: self.page_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn animal(id: &str, name: &str, species: &str, age: Option<f64>) -> Animal {
        let mut animal = Animal::new(AnimalId::new(id), name, species);
        animal.age = age;
        animal
    }

    fn rex_and_milo() -> Vec<Animal> {
        vec![
            animal("1", "Rex", "Dog", Some(3.0)),
            animal("2", "Milo", "Cat", None),
        ]
    }

    fn names(page: &TablePage) -> Vec<&str> {
        page.rows.iter().map(|row| row.name.as_str()).collect()
    }

    #[test]
    fn health_colors_are_case_insensitive() {
        assert_eq!(health_tag_color(Some("healthy")), TagColor::Green);
        assert_eq!(health_tag_color(Some("HEALTHY")), TagColor::Green);
        assert_eq!(health_tag_color(Some("Sick")), TagColor::Orange);
        assert_eq!(health_tag_color(Some("inJured")), TagColor::Red);
        assert_eq!(health_tag_color(Some("Unknown")), TagColor::Blue);
        assert_eq!(health_tag_color(Some("recovering")), TagColor::Blue);
        assert_eq!(health_tag_color(None), TagColor::Blue);
    }

    #[test]
    fn rows_apply_unknown_fallbacks() {
        let mut record = animal("9", "Pip", "Bird", None);
        record.last_seen = Some("2024-05-01".to_string());
        let row = AnimalRow::from_animal(&record);
        assert_eq!(row.age, "Unknown");
        assert_eq!(row.health, "Unknown");
        assert_eq!(row.health_color, TagColor::Blue);
        assert_eq!(row.last_seen, "5/1/2024");
        assert_eq!(row.breed, "");

        record.last_seen = None;
        record.age = Some(4.5);
        record.health = Some("Sick".to_string());
        let row = AnimalRow::from_animal(&record);
        assert_eq!(row.age, "4.5 years");
        assert_eq!(row.health, "Sick");
        assert_eq!(row.last_seen, "Unknown");
    }

    #[test]
    fn age_formatting_treats_zero_as_unknown() {
        assert_eq!(format_age(Some(3.0)), "3 years");
        assert_eq!(format_age(Some(0.0)), "Unknown");
        assert_eq!(format_age(None), "Unknown");
    }

    #[test]
    fn last_seen_formatting_handles_timestamps_and_garbage() {
        assert_eq!(
            format_last_seen(Some("2023-12-25T08:30:00+00:00")),
            "12/25/2023"
        );
        assert_eq!(format_last_seen(Some("")), "Unknown");
        assert_eq!(format_last_seen(Some("soon")), "Invalid Date");
    }

    #[test]
    fn view_renders_every_loaded_record() {
        let mut animals = rex_and_milo();
        animals[0].breed = Some("Beagle".to_string());
        animals[0].health = Some("Healthy".to_string());
        animals[0].location = Some("Kennel 4".to_string());
        animals[0].last_seen = Some("2024-03-09".to_string());
        let mut table = TableState::default();
        let page = table.view(&animals);
        assert_eq!(page.total, 2);
        assert_eq!(page.source_indices, vec![0, 1]);
        assert_eq!(
            page.rows[0],
            AnimalRow {
                id: AnimalId::new("1"),
                name: "Rex".to_string(),
                species: "Dog".to_string(),
                breed: "Beagle".to_string(),
                age: "3 years".to_string(),
                health: "Healthy".to_string(),
                health_color: TagColor::Green,
                location: "Kennel 4".to_string(),
                last_seen: "3/9/2024".to_string(),
            }
        );
        assert_eq!(
            page.rows[1],
            AnimalRow {
                id: AnimalId::new("2"),
                name: "Milo".to_string(),
                species: "Cat".to_string(),
                breed: String::new(),
                age: "Unknown".to_string(),
                health: "Unknown".to_string(),
                health_color: TagColor::Blue,
                location: String::new(),
                last_seen: "Unknown".to_string(),
            }
        );
    }

    #[test]
    fn sort_by_name_and_age() {
        let animals = rex_and_milo();
        let mut table = TableState::default();

        table.toggle_sort(SortColumn::Name);
        assert_eq!(names(&table.view(&animals)), vec!["Milo", "Rex"]);
        table.toggle_sort(SortColumn::Name);
        assert_eq!(names(&table.view(&animals)), vec!["Rex", "Milo"]);

        table.toggle_sort(SortColumn::Age);
        assert_eq!(names(&table.view(&animals)), vec!["Milo", "Rex"]);
    }

    #[test]
    fn sort_cycle_returns_to_load_order() {
        let animals = vec![
            animal("1", "b", "Dog", None),
            animal("2", "a", "Dog", None),
        ];
        let mut table = TableState::default();
        table.toggle_sort(SortColumn::Name);
        table.toggle_sort(SortColumn::Name);
        table.toggle_sort(SortColumn::Name);
        assert_eq!(table.sort().column, None);
        assert_eq!(names(&table.view(&animals)), vec!["b", "a"]);
    }

    #[test]
    fn name_collation_ignores_case_first() {
        let mut collator = Collator::default();
        assert_eq!(compare_names(&mut collator, "apple", "Banana"), Ordering::Less);
        assert_eq!(compare_names(&mut collator, "Zed", "alpha"), Ordering::Greater);
        assert_eq!(compare_names(&mut collator, "rex", "Rex"), Ordering::Less);
        assert_eq!(compare_names(&mut collator, "Rex", "Rex"), Ordering::Equal);
    }

    #[test]
    fn accented_names_sort_with_their_base_letter() {
        let mut collator = Collator::default();
        assert_eq!(compare_names(&mut collator, "Émile", "Zed"), Ordering::Less);
        assert_eq!(compare_names(&mut collator, "Émile", "Emma"), Ordering::Less);
        assert_eq!(compare_names(&mut collator, "Ångström", "Bea"), Ordering::Less);

        let animals = vec![
            animal("1", "Zed", "Dog", None),
            animal("2", "Émile", "Cat", None),
            animal("3", "Bea", "Cat", None),
        ];
        let mut table = TableState::default();
        table.toggle_sort(SortColumn::Name);
        assert_eq!(names(&table.view(&animals)), vec!["Bea", "Émile", "Zed"]);
    }

    #[test]
    fn species_options_follow_current_data() {
        let mut animals = rex_and_milo();
        animals.push(animal("3", "Fido", "Dog", Some(1.0)));
        let options = species_filter_options(&animals);
        assert_eq!(options, vec!["Dog".to_string(), "Cat".to_string()]);

        let expected: HashSet<&str> = animals.iter().map(|a| a.species.as_str()).collect();
        let actual: HashSet<&str> = options.iter().map(String::as_str).collect();
        assert_eq!(actual, expected);

        animals.retain(|animal| animal.species != "Cat");
        assert_eq!(species_filter_options(&animals), vec!["Dog".to_string()]);
    }

    #[test]
    fn species_filter_restricts_rows_exactly() {
        let mut animals = rex_and_milo();
        animals.push(animal("3", "Fido", "Dog", Some(1.0)));
        animals.push(animal("4", "Odie", "dog", None));
        let mut table = TableState::default();
        table.set_species_filter(["Dog"]);

        let page = table.view(&animals);
        assert_eq!(names(&page), vec!["Rex", "Fido"]);
        assert!(page.rows.iter().all(|row| row.species == "Dog"));

        table.toggle_species("Cat");
        assert_eq!(table.view(&animals).total, 3);
        table.clear_species_filter();
        assert_eq!(table.view(&animals).total, 4);
    }

    #[test]
    fn pagination_clamps_and_jumps() {
        let animals: Vec<Animal> = (0..23)
            .map(|index| animal(&index.to_string(), &format!("A{index:02}"), "Dog", None))
            .collect();
        let mut table = TableState::default();

        let first = table.view(&animals);
        assert_eq!(first.page_count, 3);
        assert_eq!(first.rows.len(), 10);
        assert_eq!(first.summary(), "1-10 of 23 items");

        table.jump_to(99);
        let last = table.view(&animals);
        assert_eq!(last.page, 3);
        assert_eq!(last.rows.len(), 3);
        assert_eq!(last.summary(), "21-23 of 23 items");

        table.set_page_size(20);
        let resized = table.view(&animals);
        assert_eq!(resized.page, 2);
        assert_eq!(resized.page_count, 2);

        table.previous_page();
        table.previous_page();
        assert_eq!(table.view(&animals).page, 1);
    }

    #[test]
    fn empty_collection_has_a_single_empty_page() {
        let mut table = TableState::default();
        let page = table.view(&[]);
        assert_eq!(page.page, 1);
        assert_eq!(page.page_count, 1);
        assert!(page.rows.is_empty());
        assert_eq!(page.summary(), "0 items");
    }
}
