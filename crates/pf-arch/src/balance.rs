//! Throttle balance: solve for the throttle that makes an element deliver
//! the power asked of it.

use pf_components::PowerBalance;
use pf_core::{PortId, SignalId, SignalUnit};
use serde::Serialize;

use crate::error::ArchResult;
use crate::model::{ModelBuilder, path};

/// Signals of one registered balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceHandle {
    /// Path of the element whose throttle is solved for.
    pub element: String,
    #[serde(skip)]
    pub required: SignalId,
    #[serde(skip)]
    pub available: SignalId,
    #[serde(skip)]
    pub throttle: SignalId,
}

/// Register one unknown throttle per analysis point for `element` and the
/// residual `available(throttle) - required`.
///
/// The throttle starts at 0.5 and is wired into `throttle_port`. `available`
/// must be produced by the element from that throttle.
#[allow(clippy::too_many_arguments)]
pub fn throttle_from_power_balance(
    model: &mut ModelBuilder,
    scope: &str,
    element: &str,
    required: SignalId,
    available: SignalId,
    throttle_port: PortId,
    unit: SignalUnit,
    len: usize,
) -> ArchResult<BalanceHandle> {
    let name = format!("{element}_throttle_set");
    let handle = model.add(path(scope, &name), PowerBalance::new(name, len, unit));

    model.connect(required, handle.input(PowerBalance::REQUIRED))?;
    model.connect(available, handle.input(PowerBalance::AVAILABLE))?;

    let throttle = handle.output(PowerBalance::THROTTLE);
    model.connect(throttle, throttle_port)?;

    Ok(BalanceHandle {
        element: path(scope, element),
        required,
        available,
        throttle,
    })
}
