use crate::core::{internal_error_response, AppError};
use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error,
};
use futures_util::future::LocalBoxFuture;
use futures_util::FutureExt;
use std::future::{ready, Ready};
use std::panic::AssertUnwindSafe;
use std::rc::Rc;

/// Middleware that turns every unexpected fault into a well-formed 500
///
/// Handler panics and errors other than [`AppError`] become the generic
/// `internal_error` body; domain errors keep their own response.
pub struct FaultBarrier;

impl<S> Transform<S, ServiceRequest> for FaultBarrier
where
    S: Service<ServiceRequest, Response = ServiceResponse, Error = Error> + 'static,
    S::Future: 'static,
{
    type Response = ServiceResponse;
    type Error = Error;
    type InitError = ();
    type Transform = FaultBarrierMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(FaultBarrierMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct FaultBarrierMiddleware<S> {
    service: Rc<S>,
}

impl<S> Service<ServiceRequest> for FaultBarrierMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse, Error = Error> + 'static,
    S::Future: 'static,
{
    type Response = ServiceResponse;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // The request must stay uniquely owned until routing is done, so no
        // clone of it is held here; faults are returned as `AppError` instead.
        let service = self.service.clone();

        Box::pin(async move {
            let outcome = AssertUnwindSafe(async move { service.call(req).await })
                .catch_unwind()
                .await;

            match outcome {
                Ok(Ok(res)) => Ok(normalize(res)),
                Ok(Err(err)) => match err.as_error::<AppError>() {
                    Some(app_err) => {
                        log_app_error(app_err);
                        Err(err)
                    }
                    None => {
                        tracing::error!(error = ?err, "Mock API error");
                        Err(AppError::internal(err.to_string()).into())
                    }
                },
                Err(panic) => {
                    let reason = panic
                        .downcast_ref::<&str>()
                        .map(|s| s.to_string())
                        .or_else(|| panic.downcast_ref::<String>().cloned())
                        .unwrap_or_else(|| "unknown panic".to_string());
                    tracing::error!(reason = %reason, "Handler panicked");
                    Err(AppError::internal(format!("handler panicked: {}", reason)).into())
                }
            }
        })
    }
}

/// Replace responses rendered from non-domain errors with the generic body
fn normalize(res: ServiceResponse) -> ServiceResponse {
    let foreign = match res.response().error() {
        Some(err) => match err.as_error::<AppError>() {
            Some(app_err) => {
                log_app_error(app_err);
                false
            }
            None => {
                tracing::error!(error = ?err, "Mock API error");
                true
            }
        },
        None => false,
    };

    if !foreign {
        return res;
    }
    res.into_response(internal_error_response())
}

fn log_app_error(err: &AppError) {
    match err {
        AppError::Validation { .. } | AppError::InjectedFailure { .. } => {
            tracing::warn!(error = %err, "Request rejected")
        }
        _ => tracing::error!(error = %err, "Mock API error"),
    }
}
