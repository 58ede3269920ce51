//! Hooks registered against the engine's lifecycle events.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use contract_hooks_types::{HookError, HookEvent, HookMessage, Transaction};
use serde::Deserialize;

/// Hook receiving one transaction.
pub type TransactionHook = Arc<dyn Fn(&mut Transaction) -> Result<(), HookError> + Send + Sync>;

/// Hook receiving the full transaction list (`beforeAll` / `afterAll`).
pub type BatchHook = Arc<dyn Fn(&mut [Transaction]) -> Result<(), HookError> + Send + Sync>;

/// Registered hooks, run in registration order.
///
/// Built once at startup and then shared read-only across connections.
#[derive(Default, Clone)]
pub struct HookRegistry {
    batch: HashMap<HookEvent, Vec<BatchHook>>,
    each: HashMap<HookEvent, Vec<TransactionHook>>,
    named: HashMap<(HookEvent, String), Vec<TransactionHook>>,
}

impl fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: HashMap<&str, usize> = HookEvent::ALL
            .into_iter()
            .map(|event| (event.as_str(), self.count(event)))
            .filter(|(_, n)| *n > 0)
            .collect();
        f.debug_struct("HookRegistry").field("hooks", &counts).finish()
    }
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn before_all<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&mut [Transaction]) -> Result<(), HookError> + Send + Sync + 'static,
    {
        self.batch.entry(HookEvent::BeforeAll).or_default().push(Arc::new(hook));
        self
    }

    pub fn after_all<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&mut [Transaction]) -> Result<(), HookError> + Send + Sync + 'static,
    {
        self.batch.entry(HookEvent::AfterAll).or_default().push(Arc::new(hook));
        self
    }

    pub fn before_each<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&mut Transaction) -> Result<(), HookError> + Send + Sync + 'static,
    {
        self.on_each(HookEvent::BeforeEach, hook)
    }

    pub fn before_each_validation<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&mut Transaction) -> Result<(), HookError> + Send + Sync + 'static,
    {
        self.on_each(HookEvent::BeforeEachValidation, hook)
    }

    pub fn after_each<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&mut Transaction) -> Result<(), HookError> + Send + Sync + 'static,
    {
        self.on_each(HookEvent::AfterEach, hook)
    }

    pub fn before<F>(&mut self, name: impl Into<String>, hook: F) -> &mut Self
    where
        F: Fn(&mut Transaction) -> Result<(), HookError> + Send + Sync + 'static,
    {
        self.on_named(HookEvent::Before, name, hook)
    }

    pub fn before_validation<F>(&mut self, name: impl Into<String>, hook: F) -> &mut Self
    where
        F: Fn(&mut Transaction) -> Result<(), HookError> + Send + Sync + 'static,
    {
        self.on_named(HookEvent::BeforeValidation, name, hook)
    }

    pub fn after<F>(&mut self, name: impl Into<String>, hook: F) -> &mut Self
    where
        F: Fn(&mut Transaction) -> Result<(), HookError> + Send + Sync + 'static,
    {
        self.on_named(HookEvent::After, name, hook)
    }

    fn on_each<F>(&mut self, event: HookEvent, hook: F) -> &mut Self
    where
        F: Fn(&mut Transaction) -> Result<(), HookError> + Send + Sync + 'static,
    {
        self.each.entry(event).or_default().push(Arc::new(hook));
        self
    }

    fn on_named<F>(&mut self, event: HookEvent, name: impl Into<String>, hook: F) -> &mut Self
    where
        F: Fn(&mut Transaction) -> Result<(), HookError> + Send + Sync + 'static,
    {
        self.named.entry((event, name.into())).or_default().push(Arc::new(hook));
        self
    }

    /// Number of hooks registered for an event, named hooks included.
    pub fn count(&self, event: HookEvent) -> usize {
        let batch = self.batch.get(&event).map_or(0, Vec::len);
        let each = self.each.get(&event).map_or(0, Vec::len);
        let named: usize =
            self.named.iter().filter(|((e, _), _)| *e == event).map(|(_, hooks)| hooks.len()).sum();
        batch + each + named
    }

    /// Each-hooks for `event`, then named hooks for its named counterpart.
    fn transaction_hooks<'a>(
        &'a self,
        event: HookEvent,
        name: Option<&str>,
    ) -> impl Iterator<Item = &'a TransactionHook> + 'a {
        let named = event
            .named_counterpart()
            .zip(name)
            .and_then(|(named_event, n)| self.named.get(&(named_event, n.to_string())))
            .into_iter()
            .flatten();
        self.each.get(&event).into_iter().flatten().chain(named)
    }

    /// Run per-transaction hooks for `event` against one transaction.
    ///
    /// On `beforeEach` this also runs `before` hooks registered under the
    /// transaction's name, and likewise for the validation and after events.
    pub fn run(&self, event: HookEvent, transaction: &mut Transaction) -> Result<(), HookError> {
        let name = transaction.name().map(str::to_string);
        for hook in self.transaction_hooks(event, name.as_deref()) {
            hook(&mut *transaction)?;
        }
        Ok(())
    }

    /// Run batch hooks for `event` against the whole transaction list.
    pub fn run_batch(
        &self,
        event: HookEvent,
        transactions: &mut [Transaction],
    ) -> Result<(), HookError> {
        for hook in self.batch.get(&event).into_iter().flatten() {
            hook(&mut *transactions)?;
        }
        Ok(())
    }

    /// Apply hooks to a protocol message in place.
    ///
    /// When no hook applies, `data` is left exactly as received.
    pub fn handle(&self, message: &mut HookMessage) -> Result<(), HookError> {
        let event = message.hook_event()?;

        if event.is_batch() {
            if !self.batch.get(&event).is_some_and(|hooks| !hooks.is_empty()) {
                return Ok(());
            }
            let mut transactions = Vec::<Transaction>::deserialize(&message.data)?;
            self.run_batch(event, &mut transactions)?;
            message.data = serde_json::to_value(&transactions)?;
            return Ok(());
        }

        let name = message.data.get("name").and_then(serde_json::Value::as_str);
        if self.transaction_hooks(event, name).next().is_none() {
            return Ok(());
        }
        let mut transaction = Transaction::deserialize(&message.data)?;
        self.run(event, &mut transaction)?;
        message.data = serde_json::to_value(&transaction)?;
        Ok(())
    }
}
