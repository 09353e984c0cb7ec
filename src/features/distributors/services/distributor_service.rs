use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::distributors::dtos::{
    DistributorInputDto, MapCenterDto, MapMarkerDto, MapViewDto, SuggestionsResponseDto,
    UpdateDistributorDto,
};
use crate::features::distributors::models::{Distributor, DistributorDetails};
use crate::features::distributors::repositories::DistributorRepository;
use crate::features::geocoding::GeocodingOracle;
use crate::shared::constants::{MAP_DEFAULT_CENTER, MAP_DEFAULT_ZOOM};
use crate::shared::filter::{city_suggestions, department_suggestions, LocalityFilter};

const LOAD_FAILED: &str = "Could not load distributors. Please try again.";
const SAVE_FAILED: &str = "Could not save the distributor. Please try again.";
const UPDATE_FAILED: &str = "Could not update the distributor. Please try again.";
const DELETE_FAILED: &str = "Could not delete the distributor. Please try again.";

/// Log a store failure and replace it with the message for the operation.
/// Other errors pass through untouched.
fn store_failure(message: &'static str) -> impl FnOnce(AppError) -> AppError {
    move |err| match err {
        AppError::Database(source) => {
            tracing::error!("{} ({})", message, source);
            AppError::Storage(message.to_string())
        }
        other => other,
    }
}

pub struct DistributorService {
    repository: Arc<dyn DistributorRepository>,
    geocoder: Arc<dyn GeocodingOracle>,
}

impl DistributorService {
    pub fn new(
        repository: Arc<dyn DistributorRepository>,
        geocoder: Arc<dyn GeocodingOracle>,
    ) -> Self {
        Self {
            repository,
            geocoder,
        }
    }

    pub async fn list_active(&self) -> Result<Vec<Distributor>> {
        self.repository
            .list_active()
            .await
            .map_err(store_failure(LOAD_FAILED))
    }

    pub async fn list_all(&self) -> Result<Vec<Distributor>> {
        self.repository
            .list_all()
            .await
            .map_err(store_failure(LOAD_FAILED))
    }

    /// Public listing narrowed by department and city
    pub async fn search(&self, filter: &LocalityFilter) -> Result<Vec<Distributor>> {
        let active = self.list_active().await?;
        Ok(filter.apply(&active))
    }

    /// Autocomplete values drawn from the active listing only
    pub async fn suggestions(
        &self,
        department_input: &str,
        city_input: &str,
    ) -> Result<SuggestionsResponseDto> {
        let active = self.list_active().await?;

        Ok(SuggestionsResponseDto {
            departments: department_suggestions(&active, department_input),
            cities: city_suggestions(&active, city_input),
        })
    }

    /// Markers for the filtered public listing around the national viewport
    pub async fn map_view(&self, filter: &LocalityFilter) -> Result<MapViewDto> {
        let visible = self.search(filter).await?;
        let (latitude, longitude) = MAP_DEFAULT_CENTER;

        Ok(MapViewDto {
            center: MapCenterDto {
                latitude,
                longitude,
            },
            zoom: MAP_DEFAULT_ZOOM,
            markers: visible.iter().map(MapMarkerDto::from).collect(),
        })
    }

    /// Geocode, then insert. Nothing is written when geocoding fails.
    pub async fn create(&self, dto: DistributorInputDto) -> Result<Distributor> {
        dto.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let details = DistributorDetails::from(dto);
        let coordinates = self.geocoder.geocode(&details.geocode_request()).await?;

        let distributor = self
            .repository
            .create(&details, coordinates)
            .await
            .map_err(store_failure(SAVE_FAILED))?;

        tracing::info!(
            "Created distributor {} ({}) at ({}, {})",
            distributor.id,
            distributor.name,
            distributor.latitude,
            distributor.longitude
        );

        Ok(distributor)
    }

    /// Merge the patch over the stored record, re-geocode, then write.
    ///
    /// Coordinates are recomputed on every save so that an edited address never
    /// keeps the old pin.
    pub async fn update(&self, id: Uuid, patch: UpdateDistributorDto) -> Result<Distributor> {
        let current = self
            .repository
            .find_by_id(id)
            .await
            .map_err(store_failure(LOAD_FAILED))?
            .ok_or_else(|| AppError::NotFound(format!("Distributor with id {} not found", id)))?;

        let merged = patch.merge_into(current.details());
        merged
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let details = DistributorDetails::from(merged);
        let coordinates = self.geocoder.geocode(&details.geocode_request()).await?;

        let distributor = self
            .repository
            .update(id, &details, coordinates)
            .await
            .map_err(store_failure(UPDATE_FAILED))?;

        tracing::info!("Updated distributor {}", distributor.id);
        Ok(distributor)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        self.repository
            .delete(id)
            .await
            .map_err(store_failure(DELETE_FAILED))?;
        tracing::info!("Deleted distributor {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::geocoding::Coordinates;
    use crate::shared::test_helpers::{
        fake_distributor, fake_input, InMemoryDistributorRepository, StubGeocoder,
    };
    use tokio_test::{assert_err, assert_ok};

    fn service(
        repository: Arc<InMemoryDistributorRepository>,
        geocoder: Arc<StubGeocoder>,
    ) -> DistributorService {
        DistributorService::new(repository, geocoder)
    }

    #[tokio::test]
    async fn test_created_record_appears_in_listings() {
        let repository = Arc::new(InMemoryDistributorRepository::default());
        let geocoder = Arc::new(StubGeocoder::answering(
            r#"{"latitude": 4.60971, "longitude": -74.08175}"#,
        ));
        let service = service(repository.clone(), geocoder.clone());

        let mut input = fake_input();
        input.department = "Cundinamarca".to_string();
        input.city = "Bogotá".to_string();

        let created = assert_ok!(service.create(input.clone()).await);
        assert_eq!(created.latitude, 4.60971);
        assert_eq!(created.longitude, -74.08175);
        assert_eq!(geocoder.calls(), 1);

        let all = assert_ok!(service.list_all().await);
        assert!(all.iter().any(|d| d.id == created.id && d.name == input.name));

        let active = assert_ok!(service.list_active().await);
        assert!(active.iter().any(|d| d.id == created.id));
    }

    #[tokio::test]
    async fn test_geocoding_failure_blocks_create() {
        let repository = Arc::new(InMemoryDistributorRepository::default());
        let geocoder = Arc::new(StubGeocoder::answering(r#"{"latitude": 4.60971}"#));
        let service = service(repository.clone(), geocoder);

        let err = assert_err!(service.create(fake_input()).await);
        assert!(matches!(err, AppError::Geocoding(_)));
        assert_eq!(repository.create_calls(), 0);
        assert!(assert_ok!(service.list_all().await).is_empty());
    }

    #[tokio::test]
    async fn test_invalid_input_is_rejected_before_geocoding() {
        let repository = Arc::new(InMemoryDistributorRepository::default());
        let geocoder = Arc::new(StubGeocoder::fixed(Coordinates::new(4.6, -74.0)));
        let service = service(repository.clone(), geocoder.clone());

        let mut input = fake_input();
        input.address = String::new();

        let err = assert_err!(service.create(input).await);
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(geocoder.calls(), 0);
        assert_eq!(repository.create_calls(), 0);
    }

    #[tokio::test]
    async fn test_update_regeocodes_and_keeps_other_fields() {
        let existing = fake_distributor(true, "Antioquia", "Medellín");
        let repository = Arc::new(InMemoryDistributorRepository::with(vec![existing.clone()]));
        let geocoder = Arc::new(StubGeocoder::fixed(Coordinates::new(6.17, -75.59)));
        let service = service(repository.clone(), geocoder.clone());

        let patch = UpdateDistributorDto {
            city: Some("Envigado".to_string()),
            ..Default::default()
        };

        let updated = assert_ok!(service.update(existing.id, patch).await);
        assert_eq!(updated.city, "Envigado");
        assert_eq!(updated.name, existing.name);
        assert_eq!(updated.coordinates(), Coordinates::new(6.17, -75.59));
        assert_eq!(geocoder.calls(), 1);
        assert_eq!(repository.update_calls(), 1);
    }

    #[tokio::test]
    async fn test_geocoding_failure_blocks_update() {
        let existing = fake_distributor(true, "Antioquia", "Medellín");
        let repository = Arc::new(InMemoryDistributorRepository::with(vec![existing.clone()]));
        let geocoder = Arc::new(StubGeocoder::answering("no idea"));
        let service = service(repository.clone(), geocoder);

        let patch = UpdateDistributorDto {
            address: Some("Carrera 43A # 1-50".to_string()),
            ..Default::default()
        };

        let err = assert_err!(service.update(existing.id, patch).await);
        assert!(matches!(err, AppError::Geocoding(_)));
        assert_eq!(repository.update_calls(), 0);

        let stored = assert_ok!(service.list_all().await);
        assert_eq!(stored, vec![existing]);
    }

    #[tokio::test]
    async fn test_update_unknown_id() {
        let repository = Arc::new(InMemoryDistributorRepository::default());
        let geocoder = Arc::new(StubGeocoder::fixed(Coordinates::new(4.6, -74.0)));
        let service = service(repository, geocoder.clone());

        let err = assert_err!(
            service
                .update(Uuid::now_v7(), UpdateDistributorDto::default())
                .await
        );
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(geocoder.calls(), 0);
    }

    #[tokio::test]
    async fn test_delete_unknown_id_leaves_list_unchanged() {
        let existing = vec![
            fake_distributor(true, "Antioquia", "Medellín"),
            fake_distributor(false, "Boyacá", "Tunja"),
        ];
        let repository = Arc::new(InMemoryDistributorRepository::with(existing.clone()));
        let geocoder = Arc::new(StubGeocoder::fixed(Coordinates::new(4.6, -74.0)));
        let service = service(repository, geocoder);

        let err = assert_err!(service.delete(Uuid::now_v7()).await);
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(assert_ok!(service.list_all().await).len(), existing.len());
    }

    #[tokio::test]
    async fn test_delete_removes_record() {
        let existing = fake_distributor(true, "Antioquia", "Medellín");
        let repository = Arc::new(InMemoryDistributorRepository::with(vec![existing.clone()]));
        let geocoder = Arc::new(StubGeocoder::fixed(Coordinates::new(4.6, -74.0)));
        let service = service(repository, geocoder);

        assert_ok!(service.delete(existing.id).await);
        assert!(assert_ok!(service.list_all().await).is_empty());
    }

    #[tokio::test]
    async fn test_inactive_records_stay_out_of_public_views() {
        let repository = Arc::new(InMemoryDistributorRepository::with(vec![
            fake_distributor(true, "Antioquia", "Medellín"),
            fake_distributor(false, "Boyacá", "Tunja"),
            fake_distributor(true, "Valle del Cauca", "Cali"),
        ]));
        let geocoder = Arc::new(StubGeocoder::fixed(Coordinates::new(4.6, -74.0)));
        let service = service(repository, geocoder);

        let visible = assert_ok!(service.search(&LocalityFilter::default()).await);
        assert_eq!(visible.len(), 2);
        assert!(visible.iter().all(|d| d.active));

        let suggestions = assert_ok!(service.suggestions("", "").await);
        assert_eq!(suggestions.departments, vec!["Antioquia", "Valle del Cauca"]);
        assert!(!suggestions.cities.contains(&"Tunja".to_string()));

        let map = assert_ok!(service.map_view(&LocalityFilter::new("valle", "")).await);
        assert_eq!(map.zoom, 6);
        assert_eq!(map.center.latitude, 4.5709);
        assert_eq!(map.markers.len(), 1);
        assert_eq!(map.markers[0].city, "Cali");
    }

    #[tokio::test]
    async fn test_store_failure_is_reported_per_operation() {
        let repository = Arc::new(InMemoryDistributorRepository::unavailable());
        let geocoder = Arc::new(StubGeocoder::fixed(Coordinates::new(4.6, -74.0)));
        let service = service(repository, geocoder);

        let err = assert_err!(service.list_active().await);
        assert!(matches!(err, AppError::Storage(ref m) if m == LOAD_FAILED));

        let err = assert_err!(service.search(&LocalityFilter::default()).await);
        assert!(matches!(err, AppError::Storage(ref m) if m == LOAD_FAILED));

        let err = assert_err!(service.create(fake_input()).await);
        assert!(matches!(err, AppError::Storage(ref m) if m == SAVE_FAILED));

        let err = assert_err!(service.delete(Uuid::now_v7()).await);
        assert!(matches!(err, AppError::Storage(ref m) if m == DELETE_FAILED));
    }

    #[tokio::test]
    async fn test_whitespace_only_fields_are_never_saved() {
        let existing = fake_distributor(true, "Antioquia", "Medellín");
        let repository = Arc::new(InMemoryDistributorRepository::with(vec![existing.clone()]));
        let geocoder = Arc::new(StubGeocoder::fixed(Coordinates::new(4.6, -74.0)));
        let service = service(repository.clone(), geocoder.clone());

        let mut input = fake_input();
        input.name = "   ".to_string();
        input.logo_url = "   ".to_string();
        input.description = "  ".to_string();

        let err = assert_err!(service.create(input).await);
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(repository.create_calls(), 0);

        let patch = UpdateDistributorDto {
            name: Some("  ".to_string()),
            description: Some("\t".to_string()),
            ..Default::default()
        };

        let err = assert_err!(service.update(existing.id, patch).await);
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(geocoder.calls(), 0);
        assert_eq!(repository.update_calls(), 0);
        assert_eq!(assert_ok!(service.list_all().await), vec![existing]);
    }
}
