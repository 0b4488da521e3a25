//! # weft
//!
//! A small synchronous component framework: markup templates become live,
//! composable object graphs over a retained node arena, with a
//! publish/subscribe event primitive underneath and localized string
//! substitution woven into construction.
//!
//! Everything runs on the caller's thread and the caller's stack. There is
//! no renderer, no layout, and no async machinery; weft stops at the object
//! graph and its events.
//!
//! ## Core Systems
//!
//! - **[`dom`]** — Slotmap-backed node arena with tree operations and selector matching
//! - **[`markup`]** — Template tokenizer and fragment parser
//! - **[`event`]** — Typed envelopes, callbacks, and the synchronous event bus
//! - **[`nls`]** — Localized resource catalogs and `{i}` substitution
//! - **[`component`]** — Components, the Builder protocol, registry, widgets, handles

// Substrate
pub mod dom;
pub mod markup;

// Events and localization
pub mod event;
pub mod nls;

// Components
pub mod component;
