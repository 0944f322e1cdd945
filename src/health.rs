//! Health-check handlers.
//!
//! | Probe | Path | Question |
//! |---|---|---|
//! | **Liveness** | `/healthz` | Is the process alive? Failure → restart. |
//! | **Readiness** | `/readyz` | Can the pod serve traffic? Failure → pulled from load-balancer. |
//!
//! Both answer with the standard `{"success":true}` envelope.

use crate::controller::encode_ok;
use crate::{Request, Response};

/// Liveness probe. If the process can answer HTTP at all, it is alive.
pub fn liveness(_req: Request) -> Response {
    encode_ok()
}

/// Readiness probe. The service has no warm-up phase, so it is ready as soon
/// as it listens.
pub fn readiness(_req: Request) -> Response {
    encode_ok()
}
