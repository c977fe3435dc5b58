//! ADaM BDS column names used by time-to-event analyses.

/// Analysis value: time to event or censoring.
pub const AVAL: &str = "AVAL";

/// Censoring indicator: `0` is an event, anything else is censored.
pub const CNSR: &str = "CNSR";

/// Parameter description.
pub const PARAM: &str = "PARAM";

/// Parameter code.
pub const PARAMCD: &str = "PARAMCD";
