//! Delivery-estimate merging.
//!
//! The inventory subsystem answers with positional correspondence: one
//! optional estimate per requested id, matched only by index. The merger
//! preserves the caller's id list untouched (never reordered, never
//! deduplicated) so results can be zipped back onto the matching products.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::models::Coordinate;

/// Inventory/logistics collaborator seam.
///
/// Returns one estimate per input id, in input order. The response may be
/// shorter than the request (unknown ids); it must never be keyed. Faults
/// inside an implementation are logged at that boundary and surface as
/// absent estimates, never as errors into the engine.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeliveryEstimator: Send + Sync {
    async fn estimate_delivery(
        &self,
        product_ids: &[Uuid],
        address: Option<Coordinate>,
    ) -> Vec<Option<i32>>;
}

/// Zips delivery estimates onto a page of product ids.
#[derive(Clone)]
pub struct EstimateMerger {
    estimator: Arc<dyn DeliveryEstimator>,
}

impl EstimateMerger {
    pub fn new(estimator: Arc<dyn DeliveryEstimator>) -> Self {
        Self { estimator }
    }

    /// One estimate slot per input id, positionally.
    ///
    /// Without an address every slot is absent and the collaborator is not
    /// consulted; estimates are coordinate-dependent and never fabricated.
    /// With an address the full id list goes out in a single batched call;
    /// a short response is padded with absent entries, an over-long one is
    /// truncated.
    pub async fn merge(
        &self,
        product_ids: &[Uuid],
        address: Option<Coordinate>,
    ) -> Vec<Option<i32>> {
        let Some(address) = address else {
            return vec![None; product_ids.len()];
        };

        let mut estimates = self
            .estimator
            .estimate_delivery(product_ids, Some(address))
            .await;

        estimates.truncate(product_ids.len());
        estimates.resize(product_ids.len(), None);
        estimates
    }
}

/// Default estimator: delivery time from the nearest warehouse.
///
/// Travel time is derived from the Chebyshev distance between the delivery
/// coordinate and the closest warehouse, on top of a fixed handling window.
/// Stock-level awareness belongs to the real inventory service; this
/// implementation treats every requested product as shippable.
pub struct WarehouseEstimator {
    warehouses: Vec<Coordinate>,
    handling_days: i32,
    distance_per_day: i32,
}

impl WarehouseEstimator {
    pub fn new(warehouses: Vec<Coordinate>, handling_days: i32, distance_per_day: i32) -> Self {
        Self {
            warehouses,
            handling_days,
            distance_per_day: distance_per_day.max(1),
        }
    }

    /// A small fixed warehouse network for local development and seeding.
    pub fn default_network() -> Self {
        Self::new(
            vec![
                Coordinate::new(0, 0),
                Coordinate::new(100, 100),
                Coordinate::new(-100, 50),
            ],
            1,
            25,
        )
    }

    fn days_to(&self, address: Coordinate) -> Option<i32> {
        self.warehouses
            .iter()
            .map(|warehouse| {
                let dx = (warehouse.x - address.x).abs();
                let dy = (warehouse.y - address.y).abs();
                dx.max(dy)
            })
            .min()
            .map(|distance| self.handling_days + distance / self.distance_per_day)
    }
}

#[async_trait]
impl DeliveryEstimator for WarehouseEstimator {
    async fn estimate_delivery(
        &self,
        product_ids: &[Uuid],
        address: Option<Coordinate>,
    ) -> Vec<Option<i32>> {
        let Some(address) = address else {
            return vec![None; product_ids.len()];
        };

        let days = self.days_to(address);
        product_ids.iter().map(|_| days).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<Uuid> {
        (0..n).map(|i| Uuid::from_u128(i as u128 + 1)).collect()
    }

    #[tokio::test]
    async fn test_merge_without_address_never_calls_the_estimator() {
        let mut estimator = MockDeliveryEstimator::new();
        estimator.expect_estimate_delivery().never();

        let merger = EstimateMerger::new(Arc::new(estimator));
        let estimates = merger.merge(&ids(3), None).await;

        assert_eq!(estimates, vec![None, None, None]);
    }

    #[tokio::test]
    async fn test_merge_batches_one_call_and_keeps_order() {
        let requested = ids(2);
        let expected_ids = requested.clone();

        let mut estimator = MockDeliveryEstimator::new();
        estimator
            .expect_estimate_delivery()
            .withf(move |got, address| got == expected_ids.as_slice() && address.is_some())
            .times(1)
            .returning(|_, _| vec![Some(3), None]);

        let merger = EstimateMerger::new(Arc::new(estimator));
        let estimates = merger
            .merge(&requested, Some(Coordinate::new(10, 20)))
            .await;

        assert_eq!(estimates, vec![Some(3), None]);
    }

    #[tokio::test]
    async fn test_merge_pads_short_responses() {
        let mut estimator = MockDeliveryEstimator::new();
        estimator
            .expect_estimate_delivery()
            .returning(|_, _| vec![Some(2)]);

        let merger = EstimateMerger::new(Arc::new(estimator));
        let estimates = merger.merge(&ids(3), Some(Coordinate::new(0, 0))).await;

        assert_eq!(estimates, vec![Some(2), None, None]);
    }

    #[tokio::test]
    async fn test_merge_truncates_overlong_responses() {
        let mut estimator = MockDeliveryEstimator::new();
        estimator
            .expect_estimate_delivery()
            .returning(|_, _| vec![Some(1), Some(2), Some(3)]);

        let merger = EstimateMerger::new(Arc::new(estimator));
        let estimates = merger.merge(&ids(2), Some(Coordinate::new(0, 0))).await;

        assert_eq!(estimates, vec![Some(1), Some(2)]);
    }

    #[tokio::test]
    async fn test_merge_empty_id_list_is_a_no_op_call() {
        let mut estimator = MockDeliveryEstimator::new();
        estimator
            .expect_estimate_delivery()
            .times(1)
            .returning(|_, _| Vec::new());

        let merger = EstimateMerger::new(Arc::new(estimator));
        let estimates = merger.merge(&[], Some(Coordinate::new(0, 0))).await;

        assert!(estimates.is_empty());
    }

    #[tokio::test]
    async fn test_warehouse_estimator_honors_both_axes() {
        let estimator = WarehouseEstimator::new(vec![Coordinate::new(0, 0)], 1, 10);
        let product = ids(1);

        // Same X, different Y: the estimate must differ, proving the Y axis
        // is not a copy of X.
        let near = estimator
            .estimate_delivery(&product, Some(Coordinate::new(10, 0)))
            .await;
        let far = estimator
            .estimate_delivery(&product, Some(Coordinate::new(10, 200)))
            .await;

        assert_eq!(near, vec![Some(2)]);
        assert_eq!(far, vec![Some(21)]);
        assert_ne!(near, far);
    }

    #[tokio::test]
    async fn test_warehouse_estimator_without_address_is_all_absent() {
        let estimator = WarehouseEstimator::default_network();
        let estimates = estimator.estimate_delivery(&ids(2), None).await;
        assert_eq!(estimates, vec![None, None]);
    }
}
