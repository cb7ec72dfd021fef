// Page controllers. Each keeps an explicit state record whose transitions
// are plain functions; the async wrappers only add the network round trip.
pub mod sequence;
pub mod catalog;
pub mod carousel;
pub mod suggestions;
pub mod validation;
pub mod reservation;

pub use sequence::{RequestSequence, RequestToken};
pub use catalog::{CatalogController, CatalogState};
pub use carousel::{select_featured, CarouselEvent, CarouselPolicy, CarouselState, Viewport};
pub use suggestions::{select_suggestion, Debouncer, SuggestionController, SuggestionPanel, SuggestionState};
pub use reservation::{CancelOutcome, ReservationForm, ReservationPhase, SubmitOutcome};
