//! Value Objects - Immutable, identity-less domain primitives

mod event_link;
mod link_rule;
mod recurrence_rule;
mod timezone;

pub use event_link::EventLink;
pub use link_rule::{LINK_KEY_VALUE_SEPARATOR, LINK_PAIR_SEPARATOR, LinkRule};
pub use recurrence_rule::{Frequency, RecurrenceRule, WeekdayNum};
pub use timezone::Timezone;
