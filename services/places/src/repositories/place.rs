//! Place repository for database operations
//!
//! Create and delete pair a write to the places table with a write to the
//! owning user's `place_ids` inside one transaction; either both writes
//! commit or neither persists, so readers never see a place whose owner
//! does not list it.

use anyhow::Result;
use sqlx::{PgPool, Row};
use tracing::info;
use uuid::Uuid;

use crate::models::{Coordinates, NewPlace, Place};

/// Place repository
#[derive(Clone)]
pub struct PlaceRepository {
    pool: PgPool,
}

impl PlaceRepository {
    /// Create a new place repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get all places
    pub async fn find_all(&self) -> Result<Vec<Place>> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, description, address, lat, lng, image_url, creator,
                   created_at, updated_at
            FROM places
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(map_place).collect())
    }

    /// Find a place by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Place>> {
        let row = sqlx::query(
            r#"
            SELECT id, title, description, address, lat, lng, image_url, creator,
                   created_at, updated_at
            FROM places
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(map_place))
    }

    /// Get all places owned by a user
    pub async fn find_by_creator(&self, creator: Uuid) -> Result<Vec<Place>> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, description, address, lat, lng, image_url, creator,
                   created_at, updated_at
            FROM places
            WHERE creator = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(creator)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(map_place).collect())
    }

    /// Insert a place and append its id to the owner's place set
    ///
    /// Both writes run in one transaction. If the owner row cannot be
    /// updated the transaction is dropped without commit and the insert
    /// is rolled back.
    pub async fn create(&self, new_place: &NewPlace) -> Result<Place> {
        info!("Creating place '{}' for user {}", new_place.title, new_place.creator);

        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            r#"
            INSERT INTO places (title, description, address, lat, lng, image_url, creator)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, title, description, address, lat, lng, image_url, creator,
                      created_at, updated_at
            "#,
        )
        .bind(&new_place.title)
        .bind(&new_place.description)
        .bind(&new_place.address)
        .bind(new_place.location.lat)
        .bind(new_place.location.lng)
        .bind(&new_place.image_url)
        .bind(new_place.creator)
        .fetch_one(&mut *tx)
        .await?;

        let place = map_place(&row);

        let updated = sqlx::query(
            r#"
            UPDATE users
            SET place_ids = array_append(place_ids, $1), updated_at = now()
            WHERE id = $2
            "#,
        )
        .bind(place.id)
        .bind(new_place.creator)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            // Owner vanished between the existence check and the write;
            // dropping the transaction rolls the insert back
            anyhow::bail!("Owner {} not found while creating place", new_place.creator);
        }

        tx.commit().await?;

        Ok(place)
    }

    /// Update a place's title and description
    pub async fn update(&self, id: Uuid, title: &str, description: &str) -> Result<Place> {
        let row = sqlx::query(
            r#"
            UPDATE places
            SET title = $1, description = $2, updated_at = now()
            WHERE id = $3
            RETURNING id, title, description, address, lat, lng, image_url, creator,
                      created_at, updated_at
            "#,
        )
        .bind(title)
        .bind(description)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(map_place(&row))
    }

    /// Delete a place and remove its id from the owner's place set
    ///
    /// Same all-or-nothing contract as [`create`](Self::create).
    pub async fn delete(&self, id: Uuid, creator: Uuid) -> Result<()> {
        info!("Deleting place {} for user {}", id, creator);

        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query("DELETE FROM places WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if deleted.rows_affected() == 0 {
            anyhow::bail!("Place {} not found while deleting", id);
        }

        let updated = sqlx::query(
            r#"
            UPDATE users
            SET place_ids = array_remove(place_ids, $1), updated_at = now()
            WHERE id = $2
            "#,
        )
        .bind(id)
        .bind(creator)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            anyhow::bail!("Owner {} not found while deleting place {}", creator, id);
        }

        tx.commit().await?;

        Ok(())
    }
}

fn map_place(row: &sqlx::postgres::PgRow) -> Place {
    Place {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        address: row.get("address"),
        location: Coordinates {
            lat: row.get("lat"),
            lng: row.get("lng"),
        },
        image_url: row.get("image_url"),
        creator: row.get("creator"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewUser;
    use crate::repositories::UserRepository;
    use common::database::{DatabaseConfig, init_pool, run_migrations};

    fn sample_place(creator: Uuid) -> NewPlace {
        NewPlace {
            title: "Lab".to_string(),
            description: "Workplace".to_string(),
            address: "1 Infinite Loop".to_string(),
            location: Coordinates {
                lat: 37.3318,
                lng: -122.0312,
            },
            image_url: String::new(),
            creator,
        }
    }

    /// Create and delete must leave the place row and the owner's
    /// place_ids mutually consistent, and a failed second write must roll
    /// the first one back.
    #[tokio::test]
    #[ignore = "requires a running PostgreSQL instance"]
    async fn test_create_and_delete_keep_owner_set_consistent()
    -> Result<(), Box<dyn std::error::Error>> {
        let config = DatabaseConfig::from_env()?;
        let pool = init_pool(&config).await?;
        run_migrations(&pool, &crate::MIGRATOR).await?;

        let users = UserRepository::new(pool.clone());
        let places = PlaceRepository::new(pool.clone());

        let owner = users
            .create(&NewUser {
                name: "Ada".to_string(),
                email: format!("ada-{}@example.com", Uuid::new_v4()),
                password: "secret123".to_string(),
            })
            .await?;
        assert!(owner.place_ids.is_empty());

        // Second write hits a nonexistent owner: the insert must roll back
        let phantom_owner = Uuid::new_v4();
        assert!(places.create(&sample_place(phantom_owner)).await.is_err());
        assert!(places.find_by_creator(phantom_owner).await?.is_empty());

        // Successful create updates both sides
        let place = places.create(&sample_place(owner.id)).await?;
        assert_eq!(place.creator, owner.id);

        let owner_after = users.find_by_id(owner.id).await?.expect("owner missing");
        assert!(owner_after.place_ids.contains(&place.id));

        // Delete removes both sides
        places.delete(place.id, owner.id).await?;
        assert!(places.find_by_id(place.id).await?.is_none());

        let owner_after = users.find_by_id(owner.id).await?.expect("owner missing");
        assert!(!owner_after.place_ids.contains(&place.id));

        // Deleting again reports the place as gone
        assert!(places.delete(place.id, owner.id).await.is_err());

        Ok(())
    }
}
