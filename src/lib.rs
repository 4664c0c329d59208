//! PagerDuty reporting utilities.
//!
//! The core is [`coverage`], which decides whether a set of on-call shifts
//! leaves a hole in a time window. The reports and incident tooling around it
//! pull their data from the PagerDuty REST API through [`pagerduty`].
pub mod alert;
pub mod cli;
pub mod config;
pub mod coverage;
pub mod datetool;
pub mod incidents;
pub mod ioutil;
pub mod model;
pub mod pagerduty;
pub mod report;
pub mod safelist;
