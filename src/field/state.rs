//! Time states of multi-state fields and the state-mapping rules.

use std::fmt;

/// Which temporal copy of a field to access.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldState {
    /// Current time level n+1 (being computed)
    New,
    /// Previous time level n
    Old,
    /// Time level n-1
    NM1,
    /// Half step n+1/2
    NPH,
    /// Half step n-1/2
    NMH,
}

impl FieldState {
    /// All states, in declaration order.
    pub const ALL: [FieldState; 5] = [
        FieldState::New,
        FieldState::Old,
        FieldState::NM1,
        FieldState::NPH,
        FieldState::NMH,
    ];

    /// Short name used in logs and field names.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldState::New => "New",
            FieldState::Old => "Old",
            FieldState::NM1 => "NM1",
            FieldState::NPH => "NPH",
            FieldState::NMH => "NMH",
        }
    }
}

impl fmt::Display for FieldState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State of a transported ("degrees of freedom") field, such as velocity or
/// temperature, that pairs with a requested forcing state.
///
/// Only full time levels are stored for these fields, so half states map to
/// the full level on the same side.
///
/// ```
/// use abl_forcing::field::{dof_state, FieldState};
///
/// assert_eq!(dof_state(FieldState::NPH), FieldState::New);
/// assert_eq!(dof_state(FieldState::NMH), FieldState::Old);
/// ```
#[inline]
pub fn dof_state(fstate: FieldState) -> FieldState {
    match fstate {
        FieldState::New | FieldState::NPH => FieldState::New,
        FieldState::Old | FieldState::NMH => FieldState::Old,
        FieldState::NM1 => FieldState::NM1,
    }
}

/// State of a field paired with the pressure/phi state (density) for a
/// requested forcing state.
///
/// Density keeps its half-step states; full states follow [`dof_state`].
///
/// ```
/// use abl_forcing::field::{phi_state, FieldState};
///
/// assert_eq!(phi_state(FieldState::NPH), FieldState::NPH);
/// assert_eq!(phi_state(FieldState::Old), FieldState::Old);
/// ```
#[inline]
pub fn phi_state(fstate: FieldState) -> FieldState {
    match fstate {
        FieldState::NPH | FieldState::NMH => fstate,
        _ => dof_state(fstate),
    }
}
