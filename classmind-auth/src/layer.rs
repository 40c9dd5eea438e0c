use futures_util::{future::BoxFuture, Future};
use http::{Request, Response};
use log::debug;
use pin_project::pin_project;

use std::{
    pin::Pin,
    sync::Arc,
    task::{ready, Context, Poll},
};
use tower::{Layer, Service};

use crate::{authenticator::Authenticator, error_handler::ErrorHandler};

/// Whether a request without valid credentials may reach the inner service.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthMode {
    /// Reject with the layer's [ErrorHandler].
    Required,
    /// Forward without an [AuthenticatedUser](crate::claims::AuthenticatedUser) extension.
    Optional,
}

trait Authorize<ReqBody, ResBody> {
    type Future: Future<Output = Result<Request<ReqBody>, Response<ResBody>>>;

    fn authorize(&mut self, request: Request<ReqBody>) -> Self::Future;
}

impl<S, ReqBody, ResBody> Authorize<ReqBody, ResBody> for AuthService<S, ResBody>
where
    ReqBody: Send + 'static,
    ResBody: Send + 'static,
{
    type Future = BoxFuture<'static, Result<Request<ReqBody>, Response<ResBody>>>;

    fn authorize(&mut self, mut request: Request<ReqBody>) -> Self::Future {
        let authenticator = self.authenticator.clone();
        let error_handler = self.error_handler.clone();
        let mode = self.mode;
        Box::pin(async move {
            let result = authenticator.authenticate(request.headers()).await;
            match result {
                Ok(user) => {
                    request.extensions_mut().insert(user);
                    Ok(request)
                }
                Err(error) => match mode {
                    AuthMode::Optional => {
                        debug!("Continuing without user: {}", error);
                        Ok(request)
                    }
                    AuthMode::Required => Err(error_handler.map_error(error)),
                },
            }
        })
    }
}

pub struct AuthLayer<ResBody> {
    authenticator: Authenticator,
    error_handler: Arc<dyn ErrorHandler<ResBody>>,
    mode: AuthMode,
}

impl<ResBody> Clone for AuthLayer<ResBody> {
    fn clone(&self) -> Self {
        Self {
            authenticator: self.authenticator.clone(),
            error_handler: self.error_handler.clone(),
            mode: self.mode,
        }
    }
}

impl<S, ResBody> Layer<S> for AuthLayer<ResBody> {
    type Service = AuthService<S, ResBody>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthService {
            inner,
            authenticator: self.authenticator.clone(),
            error_handler: self.error_handler.clone(),
            mode: self.mode,
        }
    }
}

impl<ResBody> AuthLayer<ResBody> {
    pub(crate) fn new(
        authenticator: Authenticator,
        error_handler: Arc<dyn ErrorHandler<ResBody>>,
        mode: AuthMode,
    ) -> Self {
        AuthLayer {
            authenticator,
            error_handler,
            mode,
        }
    }

    pub fn mode(&self) -> AuthMode {
        self.mode
    }
}

pub struct AuthService<S, ResBody> {
    inner: S,
    authenticator: Authenticator,
    error_handler: Arc<dyn ErrorHandler<ResBody>>,
    mode: AuthMode,
}

impl<S, ResBody> Clone for AuthService<S, ResBody>
where
    S: Clone,
{
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            authenticator: self.authenticator.clone(),
            error_handler: self.error_handler.clone(),
            mode: self.mode,
        }
    }
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for AuthService<S, ResBody>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone,
    ResBody: Send + 'static,
    ReqBody: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = ResponseFuture<S, ReqBody, ResBody>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<ReqBody>) -> Self::Future {
        // Keep the instance that was polled ready for this call.
        let clone = self.inner.clone();
        let inner = std::mem::replace(&mut self.inner, clone);
        let authorize = self.authorize(request);

        ResponseFuture {
            state: State::Authorize { authorize },
            service: inner,
        }
    }
}

type AuthorizeFuture<S, ReqBody, ResBody> =
    <AuthService<S, ResBody> as Authorize<ReqBody, ResBody>>::Future;

#[pin_project]
pub struct ResponseFuture<S, ReqBody, ResBody>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
    ReqBody: Send + 'static,
    ResBody: Send + 'static,
{
    #[pin]
    state: State<AuthorizeFuture<S, ReqBody, ResBody>, S::Future>,
    service: S,
}

#[pin_project(project = StateProj)]
enum State<A, SFut> {
    Authorize {
        #[pin]
        authorize: A,
    },
    Authorized {
        #[pin]
        fut: SFut,
    },
}

impl<S, ReqBody, ResBody> Future for ResponseFuture<S, ReqBody, ResBody>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
    ResBody: Send + 'static,
    ReqBody: Send + 'static,
{
    type Output = Result<Response<ResBody>, S::Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut this = self.project();

        loop {
            match this.state.as_mut().project() {
                StateProj::Authorize { authorize } => {
                    let auth = ready!(authorize.poll(cx));
                    match auth {
                        Ok(req) => {
                            let fut = this.service.call(req);
                            this.state.set(State::Authorized { fut })
                        }
                        Err(res) => {
                            return Poll::Ready(Ok(res));
                        }
                    };
                }
                StateProj::Authorized { fut } => {
                    return fut.poll(cx);
                }
            }
        }
    }
}
