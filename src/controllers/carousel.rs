//! Featured-car carousel: which cars it shows and how it scrolls.
//!
//! The scroll behaviour is a state machine fed with [`CarouselEvent`]s. It
//! never touches a real scroll container; callers apply the offsets it
//! returns and report external scrolls back with `Scrolled`.

use std::time::Duration;

use crate::models::Car;

/// Horizontal distance of one step, in pixels.
pub const CARD_SCROLL_AMOUNT: f64 = 300.0;
pub const AUTOPLAY_INTERVAL: Duration = Duration::from_secs(3);
pub const SCROLL_ANIMATION: Duration = Duration::from_millis(500);
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);
/// Scroll pixels per pixel of pointer movement while dragging.
pub const DRAG_SPEED: f64 = 2.0;
pub const DEFAULT_FEATURED_LIMIT: usize = 12;

/// Which available cars make it into the carousel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CarouselPolicy {
    AllAvailable,
    /// The `n` most expensive available cars, most expensive first.
    TopByPrice(usize),
}

impl Default for CarouselPolicy {
    fn default() -> Self {
        CarouselPolicy::TopByPrice(DEFAULT_FEATURED_LIMIT)
    }
}

/// Available cars only, ordered and truncated according to `policy`.
pub fn select_featured(cars: &[Car], policy: CarouselPolicy) -> Vec<Car> {
    let mut featured: Vec<Car> = cars.iter().filter(|c| c.available).cloned().collect();
    if let CarouselPolicy::TopByPrice(limit) = policy {
        featured.sort_by(|a, b| b.price_per_day.total_cmp(&a.price_per_day));
        featured.truncate(limit);
    }
    featured
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
    pub scroll_left: f64,
    pub scroll_width: f64,
    pub client_width: f64,
}

impl Viewport {
    pub fn max_scroll(&self) -> f64 {
        (self.scroll_width - self.client_width).max(0.0)
    }

    pub fn clamp(&self, offset: f64) -> f64 {
        offset.clamp(0.0, self.max_scroll())
    }

    /// Within a pixel of the right edge.
    pub fn at_end(&self) -> bool {
        self.scroll_left >= self.max_scroll() - 1.0
    }
}

/// Scroll position as a percentage in `[0, 100]`. Content that fits the
/// viewport reports 0.
pub fn progress(viewport: &Viewport) -> f64 {
    let max = viewport.max_scroll();
    if max <= 0.0 {
        return 0.0;
    }
    (viewport.scroll_left / max * 100.0).clamp(0.0, 100.0)
}

pub fn ease_in_out_quad(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        -1.0 + (4.0 - 2.0 * t) * t
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollAnimation {
    pub from: f64,
    pub to: f64,
    pub duration: Duration,
}

impl ScrollAnimation {
    pub fn new(from: f64, to: f64) -> Self {
        Self { from, to, duration: SCROLL_ANIMATION }
    }

    pub fn offset_at(&self, elapsed: Duration) -> f64 {
        let t = if self.duration.is_zero() {
            1.0
        } else {
            elapsed.as_secs_f64() / self.duration.as_secs_f64()
        };
        self.from + (self.to - self.from) * ease_in_out_quad(t)
    }

    pub fn is_finished(&self, elapsed: Duration) -> bool {
        elapsed >= self.duration
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CarouselEvent {
    AutoplayTick,
    Previous,
    Next,
    PointerEnter,
    PointerLeave,
    PointerDown { x: f64 },
    PointerMove { x: f64 },
    PointerUp,
    /// Time since the previous frame.
    Frame(Duration),
    Scrolled { scroll_left: f64 },
    Resized { scroll_width: f64, client_width: f64 },
}

#[derive(Clone, Copy, Debug)]
struct DragSession {
    start_x: f64,
    start_scroll: f64,
}

#[derive(Clone, Copy, Debug)]
struct RunningAnimation {
    animation: ScrollAnimation,
    elapsed: Duration,
}

#[derive(Clone, Debug)]
pub struct CarouselState {
    cards: Vec<Car>,
    viewport: Viewport,
    card_width: f64,
    hovering: bool,
    drag: Option<DragSession>,
    animation: Option<RunningAnimation>,
}

impl CarouselState {
    pub fn new(cards: Vec<Car>, client_width: f64) -> Self {
        let mut state = Self {
            cards: Vec::new(),
            viewport: Viewport { client_width, ..Default::default() },
            card_width: CARD_SCROLL_AMOUNT,
            hovering: false,
            drag: None,
            animation: None,
        };
        state.set_cards(cards);
        state
    }

    /// Replace the cards and return to the start.
    pub fn set_cards(&mut self, cards: Vec<Car>) {
        self.viewport.scroll_width = cards.len() as f64 * self.card_width;
        self.viewport.scroll_left = 0.0;
        self.cards = cards;
        self.drag = None;
        self.animation = None;
    }

    pub fn cards(&self) -> &[Car] {
        &self.cards
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn progress(&self) -> f64 {
        progress(&self.viewport)
    }

    /// Index of the card at the left edge.
    pub fn current_index(&self) -> usize {
        if self.cards.is_empty() {
            return 0;
        }
        let idx = (self.viewport.scroll_left / self.card_width).round() as usize;
        idx.min(self.cards.len() - 1)
    }

    pub fn is_paused(&self) -> bool {
        self.hovering || self.drag.is_some()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Feed one event. Returns the new scroll offset when it changed.
    pub fn handle(&mut self, event: CarouselEvent) -> Option<f64> {
        match event {
            CarouselEvent::AutoplayTick => {
                if self.is_paused() {
                    return None;
                }
                let target = if self.viewport.at_end() {
                    0.0
                } else {
                    self.viewport.scroll_left + self.card_width
                };
                self.animate_to(target);
                None
            }
            CarouselEvent::Previous => {
                self.animate_to(self.viewport.scroll_left - self.card_width);
                None
            }
            CarouselEvent::Next => {
                self.animate_to(self.viewport.scroll_left + self.card_width);
                None
            }
            CarouselEvent::PointerEnter => {
                self.hovering = true;
                None
            }
            CarouselEvent::PointerLeave => {
                self.hovering = false;
                self.drag = None;
                None
            }
            CarouselEvent::PointerDown { x } => {
                self.animation = None;
                self.drag = Some(DragSession {
                    start_x: x,
                    start_scroll: self.viewport.scroll_left,
                });
                None
            }
            CarouselEvent::PointerMove { x } => {
                let drag = self.drag?;
                let walk = (x - drag.start_x) * DRAG_SPEED;
                self.scroll_to(drag.start_scroll - walk)
            }
            CarouselEvent::PointerUp => {
                self.drag = None;
                None
            }
            CarouselEvent::Frame(dt) => {
                let mut running = self.animation?;
                running.elapsed += dt;
                let offset = running.animation.offset_at(running.elapsed);
                self.animation = if running.animation.is_finished(running.elapsed) {
                    None
                } else {
                    Some(running)
                };
                self.scroll_to(offset)
            }
            CarouselEvent::Scrolled { scroll_left } => {
                self.viewport.scroll_left = self.viewport.clamp(scroll_left);
                None
            }
            CarouselEvent::Resized { scroll_width, client_width } => {
                self.viewport.scroll_width = scroll_width;
                self.viewport.client_width = client_width;
                self.viewport.scroll_left = self.viewport.clamp(self.viewport.scroll_left);
                None
            }
        }
    }

    fn animate_to(&mut self, target: f64) {
        let from = self.viewport.scroll_left;
        let to = self.viewport.clamp(target);
        if (to - from).abs() < f64::EPSILON {
            self.animation = None;
            return;
        }
        self.animation = Some(RunningAnimation {
            animation: ScrollAnimation::new(from, to),
            elapsed: Duration::ZERO,
        });
    }

    fn scroll_to(&mut self, offset: f64) -> Option<f64> {
        let offset = self.viewport.clamp(offset);
        if (offset - self.viewport.scroll_left).abs() < f64::EPSILON {
            return None;
        }
        self.viewport.scroll_left = offset;
        Some(offset)
    }
}

/// Run autoplay for `ticks` advances, feeding frames in between and calling
/// `render` after every change.
pub async fn play<F>(state: &mut CarouselState, ticks: usize, mut render: F)
where
    F: FnMut(&CarouselState),
{
    let mut autoplay = tokio::time::interval(AUTOPLAY_INTERVAL);
    let mut frames = tokio::time::interval(FRAME_INTERVAL);
    autoplay.tick().await;
    render(state);

    let mut remaining = ticks;
    while remaining > 0 || state.is_animating() {
        tokio::select! {
            _ = autoplay.tick(), if remaining > 0 => {
                remaining -= 1;
                state.handle(CarouselEvent::AutoplayTick);
            }
            _ = frames.tick() => {
                if state.handle(CarouselEvent::Frame(FRAME_INTERVAL)).is_some() {
                    render(state);
                }
            }
        }
    }
}
