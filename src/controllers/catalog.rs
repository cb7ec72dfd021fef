use crate::api::{self, ApiClient};
use crate::error::Result;
use crate::models::{Car, FilterState, FilterVocabulary};

use super::carousel::{select_featured, CarouselPolicy};
use super::sequence::{RequestSequence, RequestToken};

/// Everything the catalog page shows: the filter controls, the car grid and
/// the carousel subset.
#[derive(Clone, Debug, Default)]
pub struct CatalogState {
    filters: FilterState,
    vocabulary: FilterVocabulary,
    cars: Vec<Car>,
    available: Vec<Car>,
    featured: Vec<Car>,
    policy: CarouselPolicy,
    sequence: RequestSequence,
}

impl CatalogState {
    pub fn new(policy: CarouselPolicy) -> Self {
        Self {
            policy,
            ..Default::default()
        }
    }

    /// Record the filters the user just chose and issue a token for the
    /// request that will answer them.
    pub fn begin_load(&mut self, filters: &FilterState) -> RequestToken {
        self.filters = filters.clone();
        self.sequence.issue()
    }

    /// Apply a finished `/api/cars` request. Answers to superseded requests
    /// and failures leave the current list alone. Returns whether the lists
    /// were replaced.
    pub fn finish_load(&mut self, token: RequestToken, result: Result<Vec<Car>>) -> bool {
        if !self.sequence.is_current(token) {
            tracing::debug!(?token, "Dropping stale car list response");
            return false;
        }
        match result {
            Ok(cars) => {
                let available: Vec<Car> = cars.iter().filter(|c| c.available).cloned().collect();
                let featured = select_featured(&available, self.policy);
                self.cars = cars;
                self.available = available;
                self.featured = featured;
                true
            }
            Err(e) => {
                tracing::warn!(%e, "Error loading cars");
                false
            }
        }
    }

    pub fn set_vocabulary(&mut self, vocabulary: FilterVocabulary) {
        self.vocabulary = vocabulary;
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn vocabulary(&self) -> &FilterVocabulary {
        &self.vocabulary
    }

    pub fn cars(&self) -> &[Car] {
        &self.cars
    }

    pub fn available(&self) -> &[Car] {
        &self.available
    }

    pub fn featured(&self) -> &[Car] {
        &self.featured
    }

    pub fn policy(&self) -> CarouselPolicy {
        self.policy
    }

    /// The carousel section is hidden while a search is active.
    pub fn showcase_visible(&self) -> bool {
        !self.filters.has_search()
    }
}

pub struct CatalogController {
    api: ApiClient,
    state: CatalogState,
}

impl CatalogController {
    pub fn new(api: ApiClient, policy: CarouselPolicy) -> Self {
        Self {
            api,
            state: CatalogState::new(policy),
        }
    }

    /// Continue from an earlier state, so a failed reload keeps its lists.
    pub fn with_state(api: ApiClient, state: CatalogState) -> Self {
        Self { api, state }
    }

    pub fn state(&self) -> &CatalogState {
        &self.state
    }

    pub fn into_state(self) -> CatalogState {
        self.state
    }

    /// Populate the type and brand vocabularies. On failure they stay as they were.
    pub async fn load_filters(&mut self) -> bool {
        match api::load_filters(&self.api).await {
            Ok(vocabulary) => {
                self.state.set_vocabulary(vocabulary);
                true
            }
            Err(e) => {
                tracing::warn!(%e, "Error loading filters");
                false
            }
        }
    }

    pub async fn load_cars(&mut self, filters: &FilterState) -> bool {
        let token = self.state.begin_load(filters);
        let result = api::load_cars(&self.api, filters).await;
        self.state.finish_load(token, result)
    }

    /// Page load: vocabularies first, then the list for `filters`.
    pub async fn initialize(&mut self, filters: &FilterState) -> bool {
        self.load_filters().await;
        self.load_cars(filters).await
    }
}
