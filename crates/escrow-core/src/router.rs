//! Action codec and router
//!
//! Actions travel as `AnyAction`; the `type_url` discriminant picks a
//! registered message type. The registry is filled once at startup and
//! then shared read-only, so per-call dispatch is a single map lookup.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

use escrow_types::{Address, AnyAction, CodecError, Event, HandlerError, Msg};

use crate::context::Context;

/// Output of a successful handler
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionResult {
    pub events: Vec<Event>,
}

impl ActionResult {
    pub fn with_events(events: Vec<Event>) -> Self {
        Self { events }
    }
}

trait ErasedMsg: fmt::Debug + Send + Sync {
    fn signers(&self) -> Vec<Address>;
    fn as_any(&self) -> &dyn Any;
}

impl<M: Msg> ErasedMsg for M {
    fn signers(&self) -> Vec<Address> {
        Msg::signers(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A decoded action, still type-erased
#[derive(Debug)]
pub struct DecodedAction {
    type_url: String,
    msg: Box<dyn ErasedMsg>,
}

impl DecodedAction {
    pub fn type_url(&self) -> &str {
        &self.type_url
    }

    pub fn downcast_ref<M: Msg>(&self) -> Option<&M> {
        self.msg.as_any().downcast_ref::<M>()
    }
}

/// Turns opaque actions into typed ones
pub trait ActionCodec: Send + Sync {
    fn decode(&self, action: &AnyAction) -> Result<DecodedAction, CodecError>;

    /// Identities that must authorize the action; never empty
    fn required_signers(&self, action: &DecodedAction) -> Result<Vec<Address>, CodecError>;
}

/// Runs one decoded action against the call's context
pub trait ActionHandler: Send + Sync {
    fn handle(
        &self,
        ctx: &mut Context<'_>,
        action: &DecodedAction,
    ) -> Result<ActionResult, HandlerError>;
}

/// Resolves the handler for a decoded action
pub trait ActionRouter: Send + Sync {
    fn resolve(&self, action: &DecodedAction) -> Option<&dyn ActionHandler>;
}

struct TypedHandler<M, F> {
    handler: F,
    _marker: PhantomData<fn(M)>,
}

impl<M, F> ActionHandler for TypedHandler<M, F>
where
    M: Msg,
    F: Fn(&mut Context<'_>, &M) -> Result<ActionResult, HandlerError> + Send + Sync,
{
    fn handle(
        &self,
        ctx: &mut Context<'_>,
        action: &DecodedAction,
    ) -> Result<ActionResult, HandlerError> {
        let msg = action.downcast_ref::<M>().ok_or_else(|| {
            HandlerError::from(format!("handler for {} got {}", M::TYPE_URL, action.type_url()))
        })?;
        (self.handler)(ctx, msg)
    }
}

type DecodeFn = fn(&AnyAction) -> Result<Box<dyn ErasedMsg>, CodecError>;

struct Route {
    decode: DecodeFn,
    handler: Option<Box<dyn ActionHandler>>,
}

fn decode_as<M: Msg>(action: &AnyAction) -> Result<Box<dyn ErasedMsg>, CodecError> {
    let msg: M = action.unpack()?;
    Ok(Box::new(msg))
}

/// Registry mapping discriminant → {decode, signers, handler}
#[derive(Default)]
pub struct ActionRegistry {
    routes: BTreeMap<String, Route>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a message type with its handler
    ///
    /// Registering the same type twice replaces the earlier route.
    pub fn register<M, F>(&mut self, handler: F) -> &mut Self
    where
        M: Msg,
        F: Fn(&mut Context<'_>, &M) -> Result<ActionResult, HandlerError> + Send + Sync + 'static,
    {
        self.routes.insert(
            M::TYPE_URL.to_string(),
            Route {
                decode: decode_as::<M>,
                handler: Some(Box::new(TypedHandler {
                    handler,
                    _marker: PhantomData,
                })),
            },
        );
        self
    }

    /// Make a type decodable without routing it anywhere
    pub fn register_codec<M: Msg>(&mut self) -> &mut Self {
        self.routes.insert(
            M::TYPE_URL.to_string(),
            Route {
                decode: decode_as::<M>,
                handler: None,
            },
        );
        self
    }
}

impl ActionCodec for ActionRegistry {
    fn decode(&self, action: &AnyAction) -> Result<DecodedAction, CodecError> {
        let route = self
            .routes
            .get(&action.type_url)
            .ok_or_else(|| CodecError::UnknownType {
                type_url: action.type_url.clone(),
            })?;
        Ok(DecodedAction {
            type_url: action.type_url.clone(),
            msg: (route.decode)(action)?,
        })
    }

    fn required_signers(&self, action: &DecodedAction) -> Result<Vec<Address>, CodecError> {
        let signers = action.msg.signers();
        if signers.is_empty() {
            return Err(CodecError::NoSigners {
                type_url: action.type_url.clone(),
            });
        }
        Ok(signers)
    }
}

impl ActionRouter for ActionRegistry {
    fn resolve(&self, action: &DecodedAction) -> Option<&dyn ActionHandler> {
        self.routes
            .get(action.type_url())
            .and_then(|route| route.handler.as_deref())
    }
}
