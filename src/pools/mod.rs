//! Pool-math concerns per family and the [`PoolConcerns`] dispatch enum.
//!
//! Every family implements the five concern traits of
//! [`traits`](crate::traits). The invariant math of each family lives in a
//! `*_math` module of plain functions over upscaled
//! [`FixedPoint`](crate::math::FixedPoint) values; the concern types adapt
//! snapshots and requests to it through shared join/exit plumbing.
//!
//! # Families
//!
//! | Tags | Concerns | Math |
//! |------|----------|------|
//! | `Weighted`, `Investment`, `LiquidityBootstrapping` | [`WeightedConcerns`] | [`weighted_math`] |
//! | `Stable` | [`StableConcerns`] | [`stable_math`] |
//! | `MetaStable` | [`MetaStableConcerns`] | [`stable_math`] |
//! | `ComposableStable` | [`ComposableStableConcerns`] | [`stable_math`] |
//! | `StablePhantom` | [`StablePhantomConcerns`] | [`stable_math`] |
//! | `*Linear` | [`LinearConcerns`] | [`linear_math`] |
//! | `FX` | [`FxConcerns`] | proportional |
//! | `Gyro2`, `Gyro3`, `GyroE` | [`GyroConcerns`] | [`gyro_math`] |

pub(crate) mod common;
mod composable_stable;
mod fx;
mod gyro;
pub mod gyro_math;
mod linear;
pub mod linear_math;
mod meta_stable;
mod pool_concerns;
mod stable;
pub mod stable_math;
mod stable_phantom;
mod weighted;
pub mod weighted_math;

#[cfg(test)]
mod proptest_properties;

pub use composable_stable::ComposableStableConcerns;
pub use fx::FxConcerns;
pub use gyro::GyroConcerns;
pub use linear::LinearConcerns;
pub use meta_stable::MetaStableConcerns;
pub use pool_concerns::PoolConcerns;
pub use stable::StableConcerns;
pub use stable_phantom::StablePhantomConcerns;
pub use weighted::WeightedConcerns;
