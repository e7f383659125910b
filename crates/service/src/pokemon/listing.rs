//! Listing request wire shape and its validator.
//!
//! The request arrives loosely typed so that every menu or enum violation
//! is reported as a validation error naming the offending field, before
//! any query is built.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::ServiceError;
use crate::pagination::{render_options, PaginationMenu};

use super::query::{Range, Sort, SortDirection, SortKey};

/// Raw listing request as sent by clients.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub take: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip: Option<i64>,
    #[serde(default, alias = "sortKey", skip_serializing_if = "Option::is_none")]
    pub order_by: Option<String>,
    #[serde(default, alias = "sortDirection", skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pokemon_name_filter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pokemon_height_range: Option<RangeInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pokemon_weight_range: Option<RangeInput>,
}

impl ListingRequest {
    pub fn page(take: i64, skip: i64) -> Self {
        Self { take: Some(take), skip: Some(skip), ..Default::default() }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<i32>,
}

impl RangeInput {
    pub fn new(min: i32, max: i32) -> Self { Self { min: Some(min), max: Some(max) } }
}

/// Listing request after validation; every field is in range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidListing {
    pub take: u64,
    pub skip: u64,
    pub sort: Sort,
    pub name: Option<String>,
    pub height: Option<Range>,
    pub weight: Option<Range>,
}

#[derive(Debug, Clone, Default)]
pub struct ListingValidator {
    menu: PaginationMenu,
}

impl ListingValidator {
    pub fn new(menu: PaginationMenu) -> Self { Self { menu } }

    pub fn menu(&self) -> &PaginationMenu { &self.menu }

    /// Validate a listing request. An absent request is replaced by the
    /// menu defaults instead of failing.
    pub fn validate(&self, request: Option<&ListingRequest>) -> Result<ValidListing, ServiceError> {
        let Some(req) = request else {
            return Ok(ValidListing {
                take: self.menu.default_take(),
                skip: self.menu.default_skip(),
                sort: Sort::default(),
                name: None,
                height: None,
                weight: None,
            });
        };

        let take = check_menu("take", req.take, self.menu.take_options())?;
        let skip = check_menu("skip", req.skip, self.menu.skip_options())?;
        let key = match req.order_by.as_deref() {
            None => SortKey::default(),
            Some(raw) => raw.parse::<SortKey>().map_err(|_| {
                reject("orderBy", format!("orderBy must be one of the following values: {}", join(SortKey::ALL.iter().map(SortKey::as_str))))
            })?,
        };
        let direction = match req.order.as_deref() {
            None => SortDirection::default(),
            Some(raw) => raw.parse::<SortDirection>().map_err(|_| {
                reject("order", format!("order must be one of the following values: {}", join(SortDirection::ALL.iter().map(SortDirection::as_str))))
            })?,
        };
        let height = check_range("pokemonHeightRange", req.pokemon_height_range)?;
        let weight = check_range("pokemonWeightRange", req.pokemon_weight_range)?;

        Ok(ValidListing {
            take,
            skip,
            sort: Sort { key, direction },
            // An empty filter string matches the legacy behaviour of "no filter".
            name: req.pokemon_name_filter.clone().filter(|n| !n.is_empty()),
            height,
            weight,
        })
    }
}

fn reject(field: &str, message: String) -> ServiceError {
    warn!(field, %message, "listing_request_rejected");
    ServiceError::validation(field, message)
}

fn join<'a>(items: impl Iterator<Item = &'a str>) -> String {
    items.collect::<Vec<_>>().join(", ")
}

fn check_menu(field: &str, value: Option<i64>, options: &[u64]) -> Result<u64, ServiceError> {
    let value = value.ok_or_else(|| reject(field, format!("{field} should not be empty")))?;
    u64::try_from(value)
        .ok()
        .filter(|v| options.contains(v))
        .ok_or_else(|| reject(field, format!("{field} must be one of the following values: {}", render_options(options))))
}

fn check_range(field: &str, input: Option<RangeInput>) -> Result<Option<Range>, ServiceError> {
    let Some(input) = input else { return Ok(None) };
    let min = input.min.ok_or_else(|| reject(&format!("{field}.min"), format!("{field}.min should not be empty")))?;
    let max = input.max.ok_or_else(|| reject(&format!("{field}.max"), format!("{field}.max should not be empty")))?;
    Ok(Some(Range { min, max }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> ListingValidator { ListingValidator::default() }

    fn field_of(err: ServiceError) -> String {
        match err {
            ServiceError::Validation { field, .. } => field,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn absent_request_uses_menu_defaults() {
        let v = validator().validate(None).unwrap();
        assert_eq!(v.take, 10);
        assert_eq!(v.skip, 0);
        assert_eq!(v.sort, Sort { key: SortKey::Id, direction: SortDirection::Asc });
        assert!(v.name.is_none() && v.height.is_none() && v.weight.is_none());
    }

    #[test]
    fn take_outside_menu_is_rejected() {
        for take in [0, 1, 5, 11, 30, 100, -10] {
            let err = validator().validate(Some(&ListingRequest::page(take, 0))).unwrap_err();
            assert_eq!(field_of(err), "take", "take={take}");
        }
        for take in [10, 20, 50] {
            assert!(validator().validate(Some(&ListingRequest::page(take, 0))).is_ok());
        }
    }

    #[test]
    fn skip_outside_menu_is_rejected() {
        for skip in [-1, 1, 5, 30, 40] {
            let err = validator().validate(Some(&ListingRequest::page(10, skip))).unwrap_err();
            assert_eq!(field_of(err), "skip", "skip={skip}");
        }
        for skip in [0, 10, 20, 50] {
            assert!(validator().validate(Some(&ListingRequest::page(10, skip))).is_ok());
        }
    }

    #[test]
    fn skip_one_hundred_is_a_known_menu_gap() {
        // Page 3 at size 50 is not reachable with the literal menu.
        let err = validator().validate(Some(&ListingRequest::page(50, 100))).unwrap_err();
        assert_eq!(field_of(err), "skip");
    }

    #[test]
    fn missing_take_or_skip_names_the_field() {
        let req = ListingRequest { skip: Some(0), ..Default::default() };
        assert_eq!(field_of(validator().validate(Some(&req)).unwrap_err()), "take");
        let req = ListingRequest { take: Some(10), ..Default::default() };
        assert_eq!(field_of(validator().validate(Some(&req)).unwrap_err()), "skip");
    }

    #[test]
    fn out_of_menu_message_lists_allowed_values() {
        let err = validator().validate(Some(&ListingRequest::page(15, 0))).unwrap_err();
        match err {
            ServiceError::Validation { message, .. } => {
                assert_eq!(message, "take must be one of the following values: 10, 20, 50")
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn sort_key_and_direction_are_parsed() {
        let req = ListingRequest {
            order_by: Some("weight".into()),
            order: Some("desc".into()),
            ..ListingRequest::page(20, 10)
        };
        let v = validator().validate(Some(&req)).unwrap();
        assert_eq!(v.sort, Sort { key: SortKey::Weight, direction: SortDirection::Desc });
        assert_eq!((v.take, v.skip), (20, 10));
    }

    #[test]
    fn unknown_sort_values_are_rejected() {
        let req = ListingRequest { order_by: Some("image".into()), ..ListingRequest::page(10, 0) };
        assert_eq!(field_of(validator().validate(Some(&req)).unwrap_err()), "orderBy");
        let req = ListingRequest { order: Some("sideways".into()), ..ListingRequest::page(10, 0) };
        assert_eq!(field_of(validator().validate(Some(&req)).unwrap_err()), "order");
    }

    #[test]
    fn range_requires_both_bounds() {
        let req = ListingRequest {
            pokemon_height_range: Some(RangeInput { min: Some(1), max: None }),
            ..ListingRequest::page(10, 0)
        };
        assert_eq!(field_of(validator().validate(Some(&req)).unwrap_err()), "pokemonHeightRange.max");
        let req = ListingRequest {
            pokemon_weight_range: Some(RangeInput { min: None, max: Some(3) }),
            ..ListingRequest::page(10, 0)
        };
        assert_eq!(field_of(validator().validate(Some(&req)).unwrap_err()), "pokemonWeightRange.min");
    }

    #[test]
    fn filters_are_carried_through() {
        let req = ListingRequest {
            pokemon_name_filter: Some("Pikachu2".into()),
            pokemon_height_range: Some(RangeInput::new(1, 5)),
            pokemon_weight_range: Some(RangeInput::new(5, 1)),
            ..ListingRequest::page(50, 0)
        };
        let v = validator().validate(Some(&req)).unwrap();
        assert_eq!(v.name.as_deref(), Some("Pikachu2"));
        assert_eq!(v.height, Some(Range { min: 1, max: 5 }));
        assert_eq!(v.weight, Some(Range { min: 5, max: 1 }));
    }

    #[test]
    fn empty_name_filter_means_no_filter() {
        let req = ListingRequest { pokemon_name_filter: Some(String::new()), ..ListingRequest::page(10, 0) };
        assert!(validator().validate(Some(&req)).unwrap().name.is_none());
    }

    #[test]
    fn alternate_menu_is_honoured() {
        let menu = PaginationMenu::new(vec![5, 25], vec![0, 5, 25, 100], 25, 0).unwrap();
        let v = ListingValidator::new(menu);
        assert!(v.validate(Some(&ListingRequest::page(25, 100))).is_ok());
        assert!(v.validate(Some(&ListingRequest::page(10, 0))).is_err());
        assert_eq!(v.validate(None).unwrap().take, 25);
    }

    #[test]
    fn deserializes_wire_names_and_aliases() {
        let req: ListingRequest = serde_json::from_str(
            r#"{"take":50,"skip":0,"orderBy":"name","order":"desc","pokemonHeightRange":{"min":1,"max":5}}"#,
        ).unwrap();
        assert_eq!(req.order_by.as_deref(), Some("name"));
        assert_eq!(req.pokemon_height_range, Some(RangeInput::new(1, 5)));

        let req: ListingRequest = serde_json::from_str(r#"{"take":10,"skip":0,"sortKey":"height","sortDirection":"asc"}"#).unwrap();
        assert_eq!(req.order_by.as_deref(), Some("height"));
        assert_eq!(req.order.as_deref(), Some("asc"));
    }
}
