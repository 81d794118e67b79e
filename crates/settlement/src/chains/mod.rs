// Copyright 2025 itscheems
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


//! Chain-specific translators and action builders
//!
//! Each chain module owns its native types, the codecs between native and
//! canonical forms, and one builder per supported operation. Builders never
//! talk to a chain directly; they go through the chain's client trait so the
//! same pipeline runs against a live node or an in-memory ledger.

pub mod ethereum;
pub mod flow;
pub mod memory;
pub mod tezos;

use rust_decimal::{Decimal, RoundingStrategy};
use tessera_sdk::{
	BigNumber, FillRequest, MaxFeesBasePointSupport, OriginFeeSupport, Payout, PayoutsSupport,
	SdkError, ensure_amount, order::FULL_UNIT_BASIS_POINTS,
};

/// Split an item native id into contract and token id
///
/// The token id is the part after the last separator, so contracts that
/// contain `:` themselves are kept whole.
pub(crate) fn split_item_id(native: &str) -> Result<(&str, &str), SdkError> {
	let (contract, token_id) = native.rsplit_once(':').ok_or_else(|| {
		SdkError::InvalidIdentifier(format!("Item id without token id: {}", native))
	})?;

	if contract.is_empty() || token_id.is_empty() || !token_id.bytes().all(|b| b.is_ascii_digit())
	{
		return Err(SdkError::InvalidIdentifier(format!(
			"Malformed item id: {}",
			native
		)));
	}

	Ok((contract, token_id))
}

pub(crate) fn ensure_positive_price(price: &BigNumber) -> Result<(), SdkError> {
	if price.is_zero() {
		return Err(SdkError::invalid_request("Price must be greater than zero"));
	}
	Ok(())
}

/// Total price for `amount` tokens at `price` each
pub(crate) fn total_price(price: &BigNumber, amount: &BigNumber) -> Result<BigNumber, SdkError> {
	let total = price
		.to_decimal()?
		.checked_mul(amount.to_decimal()?)
		.ok_or_else(|| SdkError::invalid_request(format!("Price {} overflows", price)))?;
	BigNumber::from_decimal(total)
}

/// Tokens still purchasable from a bid
///
/// `take * stock / make`, rounded down to whole tokens.
pub(crate) fn remaining_take(
	make_value: &BigNumber,
	take_value: &BigNumber,
	make_stock: &BigNumber,
) -> Result<BigNumber, SdkError> {
	let make_value = make_value.to_decimal()?;
	if make_value.is_zero() {
		return Ok(BigNumber::zero());
	}

	let remaining = take_value
		.to_decimal()?
		.checked_mul(make_stock.to_decimal()?)
		.and_then(|v| v.checked_div(make_value))
		.ok_or_else(|| SdkError::invalid_request("Remaining stock overflows"))?;

	BigNumber::from_decimal(remaining.round_dp_with_strategy(0, RoundingStrategy::ToZero))
}

/// Check fee shares against the full unit
pub(crate) fn ensure_fee_shares(fees: &[Payout]) -> Result<(), SdkError> {
	let total: u64 = fees.iter().map(|f| u64::from(f.value)).sum();
	if total > u64::from(FULL_UNIT_BASIS_POINTS) {
		return Err(SdkError::invalid_request(format!(
			"Fees add up to {} basis points",
			total
		)));
	}
	Ok(())
}

/// Check payout shares add up to exactly the full unit
pub(crate) fn ensure_payout_shares(payouts: &[Payout]) -> Result<(), SdkError> {
	let total: u64 = payouts.iter().map(|p| u64::from(p.value)).sum();
	if total != u64::from(FULL_UNIT_BASIS_POINTS) {
		return Err(SdkError::invalid_request(format!(
			"Payouts add up to {} basis points, expected {}",
			total, FULL_UNIT_BASIS_POINTS
		)));
	}
	Ok(())
}

/// Resolve `maxFeesBasePoint` against what the prepared action supports
pub(crate) fn resolve_max_fees(
	value: Option<u32>,
	support: MaxFeesBasePointSupport,
) -> Result<Option<u32>, SdkError> {
	match (support, value) {
		(MaxFeesBasePointSupport::Ignored, _) => Ok(None),
		(MaxFeesBasePointSupport::Required, None) => Err(SdkError::invalid_request(
			"maxFeesBasePoint is required for this order",
		)),
		(MaxFeesBasePointSupport::Required, Some(0)) => Err(SdkError::invalid_request(
			"maxFeesBasePoint must be greater than zero",
		)),
		(MaxFeesBasePointSupport::Required, Some(v)) if v > FULL_UNIT_BASIS_POINTS => {
			Err(SdkError::invalid_request(format!(
				"maxFeesBasePoint {} exceeds {}",
				v, FULL_UNIT_BASIS_POINTS
			)))
		}
		(MaxFeesBasePointSupport::Required, Some(v)) => Ok(Some(v)),
	}
}

/// Fill constraints captured at prepare time
#[derive(Debug, Clone)]
pub(crate) struct FillCapabilities {
	pub multiple: bool,
	pub max_amount: BigNumber,
	pub origin_fee_support: OriginFeeSupport,
	pub payouts_support: PayoutsSupport,
	pub max_fees_base_point_support: MaxFeesBasePointSupport,
}

impl FillCapabilities {
	/// Validate a fill request, returning the effective `maxFeesBasePoint`
	pub fn check(&self, request: &FillRequest) -> Result<Option<u32>, SdkError> {
		ensure_amount(request.amount, self.multiple, &self.max_amount)?;

		let payouts = request.payouts.as_deref().unwrap_or_default();
		match self.payouts_support {
			PayoutsSupport::None if !payouts.is_empty() => {
				return Err(SdkError::invalid_request("This order does not accept payouts"));
			}
			PayoutsSupport::Single if payouts.len() > 1 => {
				return Err(SdkError::invalid_request("This order accepts a single payout"));
			}
			_ => {}
		}
		if !payouts.is_empty() {
			ensure_payout_shares(payouts)?;
		}

		let origin_fees = request.origin_fees.as_deref().unwrap_or_default();
		match self.origin_fee_support {
			OriginFeeSupport::None if !origin_fees.is_empty() => {
				return Err(SdkError::invalid_request(
					"This order does not accept origin fees",
				));
			}
			OriginFeeSupport::AmountOnly
				if origin_fees.windows(2).any(|w| w[0].value != w[1].value) =>
			{
				return Err(SdkError::invalid_request(
					"Origin fees on this order must share one value",
				));
			}
			_ => {}
		}
		ensure_fee_shares(origin_fees)?;

		resolve_max_fees(request.max_fees_base_point, self.max_fees_base_point_support)
	}
}

/// Random order salt
pub(crate) fn generate_salt() -> String {
	uuid::Uuid::new_v4().as_u128().to_string()
}

/// Format a decimal with a fixed number of fractional digits, refusing to round
pub(crate) fn fixed_point(value: &BigNumber, decimals: u32) -> Result<String, SdkError> {
	let mut decimal: Decimal = value.to_decimal()?.normalize();
	if decimal.scale() > decimals {
		return Err(SdkError::invalid_request(format!(
			"{} has more than {} fractional digits",
			value, decimals
		)));
	}
	decimal.rescale(decimals);
	Ok(decimal.to_string())
}
