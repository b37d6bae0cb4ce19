//! SeaORM implementation of ChargerRepository

use async_trait::async_trait;
use log::debug;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, Unchanged,
};

use crate::domain::{
    ChargerChanges, ChargerFilter, ChargerRecord, ChargerRepository, ChargerStatus, DomainError,
    DomainResult, NewCharger,
};
use crate::infrastructure::database::entities::charger;

pub struct SeaOrmChargerRepository {
    db: DatabaseConnection,
}

impl SeaOrmChargerRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn status_to_entity(status: ChargerStatus) -> charger::ChargerStatus {
    match status {
        ChargerStatus::Active => charger::ChargerStatus::Active,
        ChargerStatus::Inactive => charger::ChargerStatus::Inactive,
    }
}

fn status_to_domain(status: charger::ChargerStatus) -> ChargerStatus {
    match status {
        charger::ChargerStatus::Active => ChargerStatus::Active,
        charger::ChargerStatus::Inactive => ChargerStatus::Inactive,
    }
}

fn model_to_domain(m: charger::Model) -> ChargerRecord {
    ChargerRecord {
        id: m.id,
        owner_id: m.owner_id,
        name: m.name,
        location: m.location,
        latitude: m.latitude,
        longitude: m.longitude,
        status: status_to_domain(m.status),
        power_output_kw: m.power_output_kw,
        connector_type: m.connector_type,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn db_err(e: DbErr) -> DomainError {
    DomainError::Store(format!("Database error: {}", e))
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl ChargerRepository for SeaOrmChargerRepository {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<ChargerRecord>> {
        let model = charger::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_all(&self, filter: &ChargerFilter) -> DomainResult<Vec<ChargerRecord>> {
        let mut query = charger::Entity::find();

        if let Some(owner_id) = &filter.owner_id {
            query = query.filter(charger::Column::OwnerId.eq(owner_id.as_str()));
        }
        if let Some(status) = filter.status {
            query = query.filter(charger::Column::Status.eq(status_to_entity(status)));
        }

        let models = query
            .order_by_asc(charger::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        debug!("Loaded {} chargers for {:?}", models.len(), filter);
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn create(&self, owner_id: &str, fields: NewCharger) -> DomainResult<ChargerRecord> {
        fields.validate()?;
        let record = ChargerRecord::new(owner_id, fields);

        let active = charger::ActiveModel {
            id: Set(record.id.clone()),
            owner_id: Set(record.owner_id.clone()),
            name: Set(record.name.clone()),
            location: Set(record.location.clone()),
            latitude: Set(record.latitude),
            longitude: Set(record.longitude),
            status: Set(status_to_entity(record.status)),
            power_output_kw: Set(record.power_output_kw),
            connector_type: Set(record.connector_type.clone()),
            created_at: Set(record.created_at),
            updated_at: Set(record.updated_at),
        };

        let model = active.insert(&self.db).await.map_err(db_err)?;
        debug!("Charger {} created for owner {}", model.id, model.owner_id);
        Ok(model_to_domain(model))
    }

    async fn update(
        &self,
        record: &ChargerRecord,
        changes: ChargerChanges,
    ) -> DomainResult<ChargerRecord> {
        changes.validate()?;
        let mut updated = record.clone();
        changes.apply_to(&mut updated);

        let active = charger::ActiveModel {
            id: Unchanged(record.id.clone()),
            owner_id: Unchanged(record.owner_id.clone()),
            name: Set(updated.name),
            location: Set(updated.location),
            latitude: Set(updated.latitude),
            longitude: Set(updated.longitude),
            status: Set(status_to_entity(updated.status)),
            power_output_kw: Set(updated.power_output_kw),
            connector_type: Set(updated.connector_type),
            created_at: Unchanged(record.created_at),
            updated_at: Set(updated.updated_at),
        };

        match active.update(&self.db).await {
            Ok(model) => Ok(model_to_domain(model)),
            Err(DbErr::RecordNotUpdated) => Err(DomainError::not_found("Charger", &record.id)),
            Err(e) => Err(db_err(e)),
        }
    }

    async fn delete(&self, record: &ChargerRecord) -> DomainResult<()> {
        let result = charger::Entity::delete_by_id(record.id.as_str())
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Charger", &record.id));
        }
        debug!("Charger {} deleted", record.id);
        Ok(())
    }
}
