//! Explicit finite-difference heat stencil.
//!
//! The update for a point `(i, j)` is
//!
//! ```text
//! next(i,j) = cur(i,j) + cx * (cur(i+1,j) + cur(i-1,j) - 2 cur(i,j))
//!                      + cy * (cur(i,j+1) + cur(i,j-1) - 2 cur(i,j))
//! ```
//!
//! A worker splits each step into two passes over its haloed block so
//! the halo-dependent work can wait for communication:
//!
//! - [`HeatStencil::interior`]: every point whose neighborhood lies in the
//!   block's own data; safe to run while transfers are in flight
//! - [`HeatStencil::exterior`]: the ring of points next to the halo, as
//!   four [`ExteriorStrip`]s, run once inbound halos have arrived
//!
//! Both passes parallelize over rows with rayon and run on whatever pool
//! the caller has installed. [`reference`] is the serial whole-grid
//! solver the distributed result must match.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod kernel;
pub mod reference;
pub mod strip;

pub use kernel::{update_point, HeatStencil};
pub use strip::{ExteriorStrip, StripSpan};
