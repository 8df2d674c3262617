//! `products` namespace: price lists.

use std::collections::BTreeMap;

use super::form_of;
use crate::client::{parse_json, require_id, ApiCall, ResellerClient};
use crate::codec::{JsonFloat, RawString};
use crate::error::ApiError;
use crate::form::EncodedForm;
use crate::http::{HttpRequest, HttpResponse};

const NAMESPACE: &str = "products";

/// Prices by product key, then action (`addnewdomain`, `renewdomain`, …),
/// then term in years.
pub type PriceList = BTreeMap<String, BTreeMap<String, BTreeMap<String, JsonFloat>>>;

/// Selling prices a reseller set: product key, then pricing slab, then
/// action, then term, then price field. Leaves are kept as sent.
pub type ResellerPriceList =
    BTreeMap<String, BTreeMap<String, BTreeMap<String, BTreeMap<String, BTreeMap<String, RawString>>>>>;

/// Promotion fields as sent; nested blocks stay JSON text, see [`RawString::decode`].
pub type PromoDetails = BTreeMap<String, RawString>;

impl ResellerClient {
    pub fn build_customer_price(&self, customer_id: &str) -> Result<HttpRequest, ApiError> {
        require_id(customer_id)?;
        let form = form_of([("customer-id", customer_id)]);
        self.build_call(ApiCall::get(NAMESPACE, "customer-price", form))
    }

    pub fn parse_customer_price(&self, response: HttpResponse) -> Result<PriceList, ApiError> {
        parse_json(&response)
    }

    pub fn build_reseller_price(&self, reseller_id: &str) -> Result<HttpRequest, ApiError> {
        require_id(reseller_id)?;
        let form = form_of([("reseller-id", reseller_id)]);
        self.build_call(ApiCall::get(NAMESPACE, "reseller-price", form))
    }

    pub fn parse_reseller_price(
        &self,
        response: HttpResponse,
    ) -> Result<ResellerPriceList, ApiError> {
        parse_json(&response)
    }

    pub fn build_reseller_cost_price(&self, reseller_id: &str) -> Result<HttpRequest, ApiError> {
        require_id(reseller_id)?;
        let form = form_of([("reseller-id", reseller_id)]);
        self.build_call(ApiCall::get(NAMESPACE, "reseller-cost-price", form))
    }

    pub fn parse_reseller_cost_price(&self, response: HttpResponse) -> Result<PriceList, ApiError> {
        parse_json(&response)
    }

    pub fn build_promo_details(&self) -> Result<HttpRequest, ApiError> {
        self.build_call(ApiCall::get(NAMESPACE, "promo-details", EncodedForm::new()))
    }

    pub fn parse_promo_details(&self, response: HttpResponse) -> Result<PromoDetails, ApiError> {
        parse_json(&response)
    }
}
