use uuid::Uuid;

use cantine_domain::pagination::PageRequest;

use crate::domain::repository::{DishCategoryRepository, DishRepository};
use crate::domain::types::{Dish, DishCategory, DishFilter, NewDish};
use crate::error::CantineError;

// ── Categories ───────────────────────────────────────────────────────────────

pub struct ListCategoriesUseCase<C: DishCategoryRepository> {
    pub categories: C,
}

impl<C: DishCategoryRepository> ListCategoriesUseCase<C> {
    pub async fn execute(&self) -> Result<Vec<DishCategory>, CantineError> {
        self.categories.list().await
    }
}

pub struct CategoryInput {
    pub name: String,
    pub description: String,
    pub color: String,
}

pub struct CreateCategoryUseCase<C: DishCategoryRepository> {
    pub categories: C,
}

impl<C: DishCategoryRepository> CreateCategoryUseCase<C> {
    pub async fn execute(
        &self,
        actor: Uuid,
        input: CategoryInput,
    ) -> Result<DishCategory, CantineError> {
        if input.name.trim().is_empty() {
            return Err(CantineError::MissingData);
        }
        self.categories
            .create(&input.name, &input.description, &input.color, actor)
            .await
    }
}

pub struct UpdateCategoryUseCase<C: DishCategoryRepository> {
    pub categories: C,
}

impl<C: DishCategoryRepository> UpdateCategoryUseCase<C> {
    pub async fn execute(
        &self,
        actor: Uuid,
        id: i32,
        input: CategoryInput,
    ) -> Result<(), CantineError> {
        if input.name.trim().is_empty() {
            return Err(CantineError::MissingData);
        }
        self.categories
            .find_by_id(id)
            .await?
            .ok_or(CantineError::CategoryNotFound)?;
        self.categories
            .update(id, &input.name, &input.description, &input.color, actor)
            .await
    }
}

pub struct DeleteCategoryUseCase<C: DishCategoryRepository> {
    pub categories: C,
}

impl<C: DishCategoryRepository> DeleteCategoryUseCase<C> {
    pub async fn execute(&self, actor: Uuid, id: i32) -> Result<(), CantineError> {
        let deleted = self.categories.soft_delete(id, actor).await?;
        if !deleted {
            return Err(CantineError::CategoryNotFound);
        }
        Ok(())
    }
}

// ── Dishes ───────────────────────────────────────────────────────────────────

pub struct ListDishesUseCase<D: DishRepository> {
    pub dishes: D,
}

impl<D: DishRepository> ListDishesUseCase<D> {
    pub async fn execute(
        &self,
        filter: DishFilter,
        page: PageRequest,
    ) -> Result<Vec<Dish>, CantineError> {
        self.dishes.list(&filter, page).await
    }
}

pub struct GetDishUseCase<D: DishRepository> {
    pub dishes: D,
}

impl<D: DishRepository> GetDishUseCase<D> {
    pub async fn execute(&self, id: i32) -> Result<Dish, CantineError> {
        self.dishes
            .find_by_id(id)
            .await?
            .filter(|d| d.is_active)
            .ok_or(CantineError::DishNotFound)
    }
}

pub struct CreateDishUseCase<D: DishRepository, C: DishCategoryRepository> {
    pub dishes: D,
    pub categories: C,
}

impl<D: DishRepository, C: DishCategoryRepository> CreateDishUseCase<D, C> {
    pub async fn execute(&self, actor: Uuid, input: NewDish) -> Result<Dish, CantineError> {
        if input.name.trim().is_empty() {
            return Err(CantineError::MissingData);
        }
        if let Some(category_id) = input.category_id {
            self.categories
                .find_by_id(category_id)
                .await?
                .ok_or(CantineError::CategoryNotFound)?;
        }
        self.dishes.create(&input, actor).await
    }
}

pub struct UpdateDishUseCase<D: DishRepository, C: DishCategoryRepository> {
    pub dishes: D,
    pub categories: C,
}

impl<D: DishRepository, C: DishCategoryRepository> UpdateDishUseCase<D, C> {
    pub async fn execute(&self, actor: Uuid, id: i32, input: NewDish) -> Result<(), CantineError> {
        if input.name.trim().is_empty() {
            return Err(CantineError::MissingData);
        }
        self.dishes
            .find_by_id(id)
            .await?
            .ok_or(CantineError::DishNotFound)?;
        if let Some(category_id) = input.category_id {
            self.categories
                .find_by_id(category_id)
                .await?
                .ok_or(CantineError::CategoryNotFound)?;
        }
        self.dishes.update(id, &input, actor).await
    }
}

pub struct ToggleDishActiveUseCase<D: DishRepository> {
    pub dishes: D,
}

impl<D: DishRepository> ToggleDishActiveUseCase<D> {
    /// Flip the active flag; returns the new value.
    pub async fn execute(&self, actor: Uuid, id: i32) -> Result<bool, CantineError> {
        let dish = self
            .dishes
            .find_by_id(id)
            .await?
            .ok_or(CantineError::DishNotFound)?;
        let next = !dish.is_active;
        self.dishes.set_active(id, next, actor).await?;
        Ok(next)
    }
}

pub struct DeleteDishUseCase<D: DishRepository> {
    pub dishes: D,
}

impl<D: DishRepository> DeleteDishUseCase<D> {
    pub async fn execute(&self, actor: Uuid, id: i32) -> Result<(), CantineError> {
        let deleted = self.dishes.soft_delete(id, actor).await?;
        if !deleted {
            return Err(CantineError::DishNotFound);
        }
        Ok(())
    }
}
