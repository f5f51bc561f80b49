use crate::entities::sea_orm_active_enums::RoleEnum;
use crate::entities::user;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

pub struct UserRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> UserRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, user_id: Uuid) -> Result<Option<user::Model>, DbErr> {
        user::Entity::find_by_id(user_id).one(self.db).await
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>, DbErr> {
        user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(self.db)
            .await
    }

    pub async fn find_by_token(&self, token: &str) -> Result<Option<user::Model>, DbErr> {
        user::Entity::find()
            .filter(user::Column::Token.eq(token))
            .one(self.db)
            .await
    }

    pub async fn create(
        &self,
        email: String,
        name: String,
        password_hash: String,
        role: RoleEnum,
        token: Option<String>,
    ) -> Result<user::Model, DbErr> {
        let now = Utc::now().naive_utc();
        let user_model = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(email),
            name: Set(name),
            password: Set(password_hash),
            role: Set(role),
            token: Set(token),
            created_at: Set(now),
            updated_at: Set(now),
        };

        user_model.insert(self.db).await
    }

    /// Replaces the login token; `None` logs the user out.
    pub async fn set_token(
        &self,
        user: user::Model,
        token: Option<String>,
    ) -> Result<user::Model, DbErr> {
        let mut active_model: user::ActiveModel = user.into();
        active_model.token = Set(token);
        active_model.updated_at = Set(Utc::now().naive_utc());
        active_model.update(self.db).await
    }
}
