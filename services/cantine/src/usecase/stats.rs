use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::repository::{MenuRepository, OrderRepository, ReviewRepository};
use crate::domain::types::{DayOrderCount, DishOrderCount, RatedDish};
use crate::error::CantineError;

/// How many dishes the "top dishes" rankings return.
const TOP_DISH_LIMIT: u64 = 10;

// ── Menu quick stats ─────────────────────────────────────────────────────────

/// Counters surfaced as JSON badges in the staff dashboards.
#[derive(Debug, PartialEq, Eq)]
pub struct MenuQuickStats {
    /// Future menus still unpublished.
    pub menus_pending_publication: u64,
    /// Published menus whose cutoff falls within the next 24 hours.
    pub menus_nearing_cutoff: u64,
}

pub struct MenuQuickStatsUseCase<M: MenuRepository> {
    pub menus: M,
}

impl<M: MenuRepository> MenuQuickStatsUseCase<M> {
    pub async fn execute(&self, now: DateTime<Utc>) -> Result<MenuQuickStats, CantineError> {
        let menus_pending_publication =
            self.menus.count_pending_publication(now.date_naive()).await?;
        let menus_nearing_cutoff = self.menus.count_nearing_cutoff(now).await?;
        Ok(MenuQuickStats {
            menus_pending_publication,
            menus_nearing_cutoff,
        })
    }
}

// ── Order statistics ─────────────────────────────────────────────────────────

pub struct OrderStatistics {
    pub per_day: Vec<DayOrderCount>,
    pub top_dishes: Vec<DishOrderCount>,
}

pub struct OrderStatisticsUseCase<O: OrderRepository> {
    pub orders: O,
}

impl<O: OrderRepository> OrderStatisticsUseCase<O> {
    pub async fn execute(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<OrderStatistics, CantineError> {
        let per_day = self.orders.counts_by_day(from, to).await?;
        let top_dishes = self.orders.counts_by_dish(from, to, TOP_DISH_LIMIT).await?;
        Ok(OrderStatistics {
            per_day,
            top_dishes,
        })
    }
}

// ── Review statistics ────────────────────────────────────────────────────────

pub struct ReviewStatistics {
    pub total: u64,
    pub average: Option<f64>,
    /// Approved-review counts per star value (index 0 = one star).
    pub distribution: [u64; 5],
    pub top_dishes: Vec<RatedDish>,
}

pub struct ReviewStatisticsUseCase<R: ReviewRepository> {
    pub reviews: R,
}

impl<R: ReviewRepository> ReviewStatisticsUseCase<R> {
    pub async fn execute(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<ReviewStatistics, CantineError> {
        let distribution = self.reviews.rating_distribution(from, to).await?;
        let top_dishes = self.reviews.top_rated_dishes(from, to, TOP_DISH_LIMIT).await?;

        let total: u64 = distribution.iter().sum();
        let average = if total == 0 {
            None
        } else {
            let weighted: u64 = distribution
                .iter()
                .enumerate()
                .map(|(i, count)| (i as u64 + 1) * count)
                .sum();
            Some(weighted as f64 / total as f64)
        };

        Ok(ReviewStatistics {
            total,
            average,
            distribution,
            top_dishes,
        })
    }
}
