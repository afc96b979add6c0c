#![deny(clippy::pedantic, unsafe_code)]
#![allow(
    clippy::module_name_repetitions,
    clippy::cast_precision_loss,        // Elapsed seconds are divided as f32 like the fraction
    clippy::cast_possible_truncation,   // Predicted totals are truncated to whole seconds
    clippy::must_use_candidate,         // Field getters are self-evident
    clippy::float_cmp                   // Tests compare exactly representable fractions
)]

//! Nested hierarchical progress timers
//!
//! A [`TimerTree`] owns any number of root timers, each of which may spawn
//! nested timers for sub-operations. Every timer tracks:
//! - a completion fraction in [0.0, 1.0], clamped on every write
//! - start, last-update and predicted-end timestamps (whole seconds)
//! - an optional state label such as "formatting" or "copying"
//! - an optional notify handler plus an opaque context, called synchronously
//!   on every `touch` and `update`
//!
//! ## Prediction
//!
//! `predicted_end = start + elapsed / fraction`. With no progress yet the
//! previous prediction is kept.
//!
//! ## Nesting
//!
//! A nested timer covers a span of its parent's progress. By default the
//! parent's own fraction is never rewritten; [`TimerTree::effective_fraction`]
//! derives the overall completion through the active (most recent) child.
//! With roll-up enabled each nested `update` is forwarded to the parent as
//! `span.start + span.share * child_fraction`.
//!
//! ```rust
//! use lapse_timer::{ManualClock, TimerTree, TimerView, Timestamp};
//!
//! let clock = ManualClock::new(Timestamp::from_secs(0));
//! let mut tree: TimerTree<&'static str> = TimerTree::with_clock(clock.clone());
//! let root = tree.create(
//!     |timer: &TimerView<'_>, label: &&'static str| {
//!         println!("{label}: {:.0}%", timer.effective_fraction * 100.0);
//!     },
//!     "resize",
//! );
//!
//! clock.advance(10);
//! tree.update(root, 0.5).unwrap();
//! assert_eq!(tree.get(root).unwrap().predicted_end(), Timestamp::from_secs(20));
//!
//! let copy = tree.new_nested(root).unwrap();
//! tree.set_state_name(copy, Some("copying")).unwrap();
//! tree.update(copy, 0.5).unwrap();
//! assert_eq!(tree.effective_fraction(root).unwrap(), 0.75);
//! tree.destroy_nested(root, copy).unwrap();
//! ```

pub mod clock;
pub mod nest;
pub mod notify;
pub mod state;
pub mod tree;

pub use clock::{clock_for, Clock, ManualClock, MonotonicClock, SystemClock};
pub use nest::NestSpan;
pub use notify::{EventNotifier, NotifyHandler, TimerView};
pub use state::{clamp_fraction, predict_end, TimerState};
pub use tree::TimerTree;

pub use lapse_errors::TimerError;
pub use lapse_types::{TimerId, Timestamp};
