#![forbid(unsafe_code)]

//! Scripted installer double.
//!
//! [`ScriptedHost`] plays the role of the external installer: it builds
//! [`CallContext`] bundles around scripted original operations, records
//! every notification the engine emits, and exposes read/write entry points
//! shaped like the accessors a real binding would install. Integration
//! tests drive the declarative tables through it end to end.

use std::cell::RefCell;
use std::rc::Rc;

use rectveil_engine::intercept::{CallContext, OriginalOp, TrackedOperation};
use rectveil_engine::policy::PolicyAccessor;
use rectveil_engine::property::RectProperty;
use rectveil_engine::tracked::TrackedRect;
use rectveil_engine::{ContextId, Result, SettingsPolicy, SpoofEngine};

/// Installer double bound to one engine and one context.
#[derive(Debug)]
pub struct ScriptedHost {
    engine: Rc<SpoofEngine>,
    policy: Rc<dyn PolicyAccessor>,
    context: ContextId,
    notifications: Rc<RefCell<Vec<String>>>,
}

impl ScriptedHost {
    /// Host with default policy settings.
    pub fn new(engine: Rc<SpoofEngine>, context: ContextId) -> Self {
        Self::with_policy(engine, context, Rc::new(SettingsPolicy::default()))
    }

    /// Host with an explicit policy accessor.
    pub fn with_policy(
        engine: Rc<SpoofEngine>,
        context: ContextId,
        policy: Rc<dyn PolicyAccessor>,
    ) -> Self {
        Self {
            engine,
            policy,
            context,
            notifications: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// The engine under test.
    pub fn engine(&self) -> &Rc<SpoofEngine> {
        &self.engine
    }

    /// Every notification key emitted so far, in order.
    pub fn notifications(&self) -> Vec<String> {
        self.notifications.borrow().clone()
    }

    /// A call-context bundle around a scripted original operation.
    pub fn call_context(&self, original: OriginalOp) -> CallContext {
        let sink = Rc::clone(&self.notifications);
        CallContext {
            policy: Rc::clone(&self.policy),
            notify: Rc::new(move |key: &str| sink.borrow_mut().push(key.to_owned())),
            context: self.context,
            original,
        }
    }

    /// Drive a tracked operation end to end: wrap it, invoke it with
    /// `args`, return what page script would see.
    pub fn invoke(
        &self,
        operation: &TrackedOperation,
        original: OriginalOp,
        args: &[f64],
    ) -> Vec<Rc<TrackedRect>> {
        let wrapped = operation.factory(&self.engine);
        wrapped(&self.call_context(original), args)
    }

    /// Read a property the way an installed getter would.
    pub fn read(&self, rect: &Rc<TrackedRect>, property: RectProperty) -> Result<f64> {
        self.engine.read_scalar(rect, property)
    }

    /// Write a primary property the way an installed setter would, with
    /// the raw component store as the original setter.
    pub fn write(&self, rect: &Rc<TrackedRect>, property: RectProperty, value: f64) -> Result<()> {
        let slot = property.slot();
        let original = move |rect: &TrackedRect, value: f64| {
            if let Some(slot) = slot {
                rect.set_component(slot, value);
            }
        };
        self.engine.write_scalar(
            rect,
            property,
            value,
            self.context,
            self.policy.as_ref(),
            &original,
        )
    }

    /// Register a rectangle directly, bypassing the operation tables.
    pub fn register(&self, rect: &Rc<TrackedRect>) {
        let sink = Rc::clone(&self.notifications);
        self.engine.register_rect(
            rect,
            Rc::new(move |key: &str| sink.borrow_mut().push(key.to_owned())),
            self.context,
            Rc::clone(&self.policy),
        );
    }
}

/// Scripted original op returning clones of fixed rectangles.
pub fn scripted_rects(rects: Vec<Rc<TrackedRect>>) -> OriginalOp {
    Rc::new(move |_args: &[f64]| rects.clone())
}
