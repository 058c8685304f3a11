//! Cart persistence port.
//!
//! The saved layout carries a `version` so later field changes can be
//! detected. Payloads written before versioning existed have no `version`
//! field and are read as version 1.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{CartLine, CartState};
use crate::store::{CART_KEY, StoreError};
use crate::types::TaxRate;

/// The cart as written to storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedCart {
    #[serde(default = "PersistedCart::legacy_version")]
    pub version: u32,
    pub lines: Vec<CartLine>,
    #[serde(default)]
    pub tax_rate: TaxRate,
}

impl PersistedCart {
    /// Layout version written by this build.
    pub const CURRENT_VERSION: u32 = 1;

    const fn legacy_version() -> u32 {
        1
    }

    /// Decode a stored payload, checking its layout version first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnsupportedVersion`] for a newer layout and
    /// [`StoreError::Serialization`] for malformed JSON.
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        if let Some(found) = value.get("version").and_then(serde_json::Value::as_u64)
            && found > u64::from(Self::CURRENT_VERSION)
        {
            return Err(StoreError::UnsupportedVersion {
                key: CART_KEY,
                found,
                supported: Self::CURRENT_VERSION,
            });
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Encode for storage.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Serialization`] if encoding fails.
    pub fn to_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Rebuild a cart, repairing any stored lines that break its invariants.
    ///
    /// Lines with a zero quantity or a negative price are dropped, repeated
    /// product ids are merged into the first occurrence, and lines that would
    /// make the totals unrepresentable are dropped.
    #[must_use]
    pub fn into_state(self) -> CartState {
        let mut lines: Vec<CartLine> = Vec::with_capacity(self.lines.len());
        for line in self.lines {
            if line.quantity == 0 {
                warn!(product = %line.id, "Dropping stored cart line with zero quantity");
                continue;
            }
            if line.unit_price.is_negative() {
                warn!(
                    product = %line.id,
                    price = %line.unit_price,
                    "Dropping stored cart line with negative price"
                );
                continue;
            }
            match lines.iter_mut().find(|existing| existing.id == line.id) {
                Some(existing) => {
                    warn!(product = %line.id, "Merging duplicate stored cart line");
                    existing.quantity = existing.quantity.saturating_add(line.quantity);
                }
                None => lines.push(line),
            }
        }

        let mut state = CartState::new(self.tax_rate);
        for line in lines {
            let id = line.id.clone();
            if !state.restore_line(line) {
                warn!(product = %id, "Dropping stored cart line whose amount is too large");
            }
        }
        state
    }
}

impl From<CartState> for PersistedCart {
    fn from(state: CartState) -> Self {
        let (lines, tax_rate) = state.into_parts();
        Self {
            version: Self::CURRENT_VERSION,
            lines,
            tax_rate,
        }
    }
}

/// Load/save port for the cart.
///
/// There is a single writer, so implementations may simply overwrite.
pub trait CartRepository {
    /// The saved cart, or `None` if nothing was saved yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read or decoded.
    fn load(&self) -> Result<Option<PersistedCart>, StoreError>;

    /// Replace the saved cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn save(&mut self, cart: &PersistedCart) -> Result<(), StoreError>;
}

/// Repository that keeps the saved cart in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCartRepository {
    saved: Option<PersistedCart>,
    save_count: usize,
}

impl InMemoryCartRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A repository that already holds `cart`.
    #[must_use]
    pub const fn with_saved(cart: PersistedCart) -> Self {
        Self {
            saved: Some(cart),
            save_count: 0,
        }
    }

    /// The last saved cart.
    #[must_use]
    pub const fn saved(&self) -> Option<&PersistedCart> {
        self.saved.as_ref()
    }

    /// How many times `save` was called.
    #[must_use]
    pub const fn save_count(&self) -> usize {
        self.save_count
    }
}

impl CartRepository for InMemoryCartRepository {
    fn load(&self) -> Result<Option<PersistedCart>, StoreError> {
        Ok(self.saved.clone())
    }

    fn save(&mut self, cart: &PersistedCart) -> Result<(), StoreError> {
        self.saved = Some(cart.clone());
        self.save_count += 1;
        Ok(())
    }
}
