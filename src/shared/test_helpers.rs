use async_trait::async_trait;
use chrono::Utc;
use fake::faker::company::en::CompanyName;
use fake::faker::internet::en::SafeEmail;
use fake::faker::lorem::en::Sentence;
use fake::faker::name::en::Name;
use fake::Fake;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::clients::IdentityProvider;
use crate::features::auth::model::{AdminUser, ProviderSession, ProviderUser};
use crate::features::auth::repositories::AdminDirectory;
use crate::features::distributors::dtos::DistributorInputDto;
use crate::features::distributors::models::{
    Distributor, DistributorDetails, DistributorRow, DistributorWrite,
};
use crate::features::distributors::repositories::DistributorRepository;
use crate::features::geocoding::oracle::parse_answer;
use crate::features::geocoding::{Coordinates, GeocodeRequest, GeocodingOracle};

fn fake_phone() -> String {
    format!("300{}", (1_000_000..9_999_999u32).fake::<u32>())
}

pub fn admin_user(role: &str) -> AdminUser {
    AdminUser {
        id: Uuid::new_v4(),
        email: SafeEmail().fake(),
        name: Some(Name().fake()),
        role: role.to_string(),
    }
}

/// A complete, valid admin form
pub fn fake_input() -> DistributorInputDto {
    DistributorInputDto {
        name: CompanyName().fake(),
        department: "Cundinamarca".to_string(),
        city: "Bogotá".to_string(),
        address: format!(
            "Calle {} # {}-{}",
            (1..200).fake::<u32>(),
            (1..99).fake::<u32>(),
            (1..99).fake::<u32>()
        ),
        phone: fake_phone(),
        whatsapp_phone: fake_phone(),
        website_url: String::new(),
        google_maps_url: String::new(),
        logo_url: format!("https://cdn.example.com/logos/{}.png", Uuid::new_v4()),
        description: Sentence(3..8).fake(),
        active: true,
    }
}

pub fn fake_distributor(active: bool, department: &str, city: &str) -> Distributor {
    let mut input = fake_input();
    input.department = department.to_string();
    input.city = city.to_string();
    input.active = active;

    let details = DistributorDetails::from(input);
    stored(Uuid::now_v7(), &details, Coordinates::new(4.6, -74.08))
}

/// What the store would hand back after writing these values
fn stored(id: Uuid, details: &DistributorDetails, coordinates: Coordinates) -> Distributor {
    let write = DistributorWrite::new(details, coordinates);
    let now = Utc::now();

    Distributor::from(DistributorRow {
        id,
        nombre: write.nombre,
        telefono: write.telefono,
        whatsapp: write.whatsapp,
        pagina_web: write.pagina_web,
        departamento: write.departamento,
        ciudad: write.ciudad,
        direccion: write.direccion,
        descripcion: write.descripcion,
        google_maps_url: write.google_maps_url,
        logo_url: write.logo_url,
        latitud: write.latitud,
        longitud: write.longitud,
        activo: Some(write.activo),
        created_at: now,
        updated_at: now,
    })
}

/// Distributor store kept in a vector, newest record last
#[derive(Default)]
pub struct InMemoryDistributorRepository {
    records: Mutex<Vec<Distributor>>,
    create_calls: AtomicUsize,
    update_calls: AtomicUsize,
    unavailable: bool,
}

impl InMemoryDistributorRepository {
    pub fn with(records: Vec<Distributor>) -> Self {
        Self {
            records: Mutex::new(records),
            ..Default::default()
        }
    }

    /// Every call fails as if the database were down
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Default::default()
        }
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<()> {
        if self.unavailable {
            Err(AppError::Database(sqlx::Error::PoolTimedOut))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl DistributorRepository for InMemoryDistributorRepository {
    async fn list_active(&self) -> Result<Vec<Distributor>> {
        self.check()?;
        let mut active: Vec<Distributor> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|d| d.active)
            .cloned()
            .collect();
        active.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(active)
    }

    async fn list_all(&self) -> Result<Vec<Distributor>> {
        self.check()?;
        Ok(self.records.lock().unwrap().iter().rev().cloned().collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Distributor>> {
        self.check()?;
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.id == id)
            .cloned())
    }

    async fn create(
        &self,
        details: &DistributorDetails,
        coordinates: Coordinates,
    ) -> Result<Distributor> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;

        let distributor = stored(Uuid::now_v7(), details, coordinates);
        self.records.lock().unwrap().push(distributor.clone());
        Ok(distributor)
    }

    async fn update(
        &self,
        id: Uuid,
        details: &DistributorDetails,
        coordinates: Coordinates,
    ) -> Result<Distributor> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;

        let mut records = self.records.lock().unwrap();
        let slot = records
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Distributor with id {} not found", id)))?;

        let created_at = slot.created_at;
        *slot = stored(id, details, coordinates);
        slot.created_at = created_at;
        Ok(slot.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.check()?;

        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|d| d.id != id);

        if records.len() == before {
            return Err(AppError::NotFound(format!(
                "Distributor with id {} not found",
                id
            )));
        }
        Ok(())
    }
}

enum StubAnswer {
    Text(String),
    Fixed(Coordinates),
    Unavailable,
}

/// Geocoder with a canned answer that counts its calls
pub struct StubGeocoder {
    answer: StubAnswer,
    calls: AtomicUsize,
}

impl StubGeocoder {
    /// Answers with this model text, parsed like a real answer
    pub fn answering(text: &str) -> Self {
        Self::new(StubAnswer::Text(text.to_string()))
    }

    pub fn fixed(coordinates: Coordinates) -> Self {
        Self::new(StubAnswer::Fixed(coordinates))
    }

    pub fn unavailable() -> Self {
        Self::new(StubAnswer::Unavailable)
    }

    fn new(answer: StubAnswer) -> Self {
        Self {
            answer,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GeocodingOracle for StubGeocoder {
    async fn geocode(&self, _request: &GeocodeRequest) -> Result<Coordinates> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match &self.answer {
            StubAnswer::Text(text) => parse_answer(text),
            StubAnswer::Fixed(coordinates) => Ok(*coordinates),
            StubAnswer::Unavailable => Err(AppError::ExternalServiceError(
                "Could not determine coordinates using AI.".to_string(),
            )),
        }
    }
}

struct Account {
    email: String,
    password: String,
    user: ProviderUser,
}

/// Identity provider holding accounts and live sessions in memory
#[derive(Default)]
pub struct FakeIdentityProvider {
    accounts: Vec<Account>,
    sessions: Mutex<HashMap<String, ProviderUser>>,
    sign_out_calls: AtomicUsize,
}

impl FakeIdentityProvider {
    /// One account sharing the operator record's id and email
    pub fn with_account(user: &AdminUser, password: &str) -> Self {
        Self::default().and_account(user, password)
    }

    pub fn and_account(mut self, user: &AdminUser, password: &str) -> Self {
        self.accounts.push(Account {
            email: user.email.clone(),
            password: password.to_string(),
            user: ProviderUser {
                id: user.id.to_string(),
                email: Some(user.email.clone()),
            },
        });
        self
    }

    pub fn sign_out_calls(&self) -> usize {
        self.sign_out_calls.load(Ordering::SeqCst)
    }

    pub fn live_sessions(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }

    pub fn is_live(&self, access_token: &str) -> bool {
        self.sessions.lock().unwrap().contains_key(access_token)
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentityProvider {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ProviderSession> {
        let account = self
            .accounts
            .iter()
            .find(|a| a.email == email && a.password == password)
            .ok_or_else(|| {
                AppError::Unauthorized(
                    "Invalid credentials. Check your email and password.".to_string(),
                )
            })?;

        let access_token = format!("access-{}", Uuid::new_v4());
        self.sessions
            .lock()
            .unwrap()
            .insert(access_token.clone(), account.user.clone());

        Ok(ProviderSession {
            access_token,
            refresh_token: Some(format!("refresh-{}", Uuid::new_v4())),
            expires_in: 3600,
            user: account.user.clone(),
        })
    }

    async fn get_user(&self, access_token: &str) -> Result<Option<ProviderUser>> {
        Ok(self.sessions.lock().unwrap().get(access_token).cloned())
    }

    async fn sign_out(&self, access_token: &str) -> Result<()> {
        self.sign_out_calls.fetch_add(1, Ordering::SeqCst);

        match self.sessions.lock().unwrap().remove(access_token) {
            Some(_) => Ok(()),
            None => Err(AppError::ExternalServiceError(
                "Error signing out.".to_string(),
            )),
        }
    }
}

/// `users` table kept in memory
#[derive(Default)]
pub struct InMemoryAdminDirectory {
    users: Vec<AdminUser>,
    unavailable: bool,
}

impl InMemoryAdminDirectory {
    pub fn with(users: Vec<AdminUser>) -> Self {
        Self {
            users,
            ..Default::default()
        }
    }

    /// Every lookup fails as if the database were down
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Default::default()
        }
    }
}

#[async_trait]
impl AdminDirectory for InMemoryAdminDirectory {
    async fn find_user(&self, user_id: &str) -> Result<Option<AdminUser>> {
        if self.unavailable {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }

        Ok(self
            .users
            .iter()
            .find(|u| u.id.to_string() == user_id)
            .cloned())
    }

    async fn find_admin(&self, user_id: &str) -> Result<Option<AdminUser>> {
        Ok(self
            .find_user(user_id)
            .await?
            .filter(|u| u.is_admin()))
    }
}
