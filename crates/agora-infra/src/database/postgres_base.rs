use std::marker::PhantomData;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, DatabaseTransaction, DbConn, DbErr, EntityTrait,
    IntoActiveModel, PrimaryKeyTrait, QuerySelect, TransactionTrait,
};
use uuid::Uuid;

use agora_core::domain::{Document, ParentKind, Post, PostUpdate};
use agora_core::error::RepoError;
use agora_core::ports::{BaseRepository, PostCollection, PostPage};

/// A SeaORM entity that stores one parent document per row.
pub trait DocumentEntity: EntityTrait {
    type Doc: Document;

    fn decode(model: Self::Model) -> Result<Self::Doc, RepoError>;

    /// A fully populated active model for `doc`.
    fn encode(doc: &Self::Doc) -> Result<Self::ActiveModel, RepoError>;
}

/// Generic PostgreSQL document collection.
pub struct PostgresCollection<E>
where
    E: EntityTrait,
{
    pub(crate) db: DbConn,
    _entity: PhantomData<E>,
}

impl<E> PostgresCollection<E>
where
    E: EntityTrait,
{
    pub fn new(db: DbConn) -> Self {
        Self {
            db,
            _entity: PhantomData,
        }
    }
}

pub(crate) fn query_err(e: DbErr) -> RepoError {
    let message = e.to_string();
    if message.contains("duplicate") || message.contains("unique") {
        RepoError::Constraint(message)
    } else if matches!(e, DbErr::Conn(_) | DbErr::ConnectionAcquire(_)) {
        RepoError::Connection(message)
    } else {
        RepoError::Query(message)
    }
}

impl<E> PostgresCollection<E>
where
    E: DocumentEntity,
    E::Model: IntoActiveModel<E::ActiveModel> + Send + Sync,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send + Sync,
    E::PrimaryKey: PrimaryKeyTrait<ValueType = Uuid>,
{
    async fn load(&self, id: Uuid) -> Result<Option<E::Doc>, RepoError> {
        E::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_err)?
            .map(E::decode)
            .transpose()
    }

    async fn lock_row(txn: &DatabaseTransaction, id: Uuid) -> Result<Option<E::Doc>, RepoError> {
        E::find_by_id(id)
            .lock_exclusive()
            .one(txn)
            .await
            .map_err(query_err)?
            .map(E::decode)
            .transpose()
    }

    /// Read-modify-write one document under a row lock.
    ///
    /// `change` returns its result and whether the document needs writing.
    /// `None` if the document does not exist.
    pub(crate) async fn modify<R, F>(&self, id: Uuid, change: F) -> Result<Option<R>, RepoError>
    where
        F: FnOnce(&mut E::Doc) -> (R, bool) + Send,
        R: Send,
    {
        let txn = self.db.begin().await.map_err(query_err)?;

        let Some(mut doc) = Self::lock_row(&txn, id).await? else {
            return Ok(None);
        };
        let (result, dirty) = change(&mut doc);
        if dirty {
            E::encode(&doc)?.update(&txn).await.map_err(query_err)?;
        }

        txn.commit().await.map_err(query_err)?;
        Ok(Some(result))
    }
}

#[async_trait]
impl<E> BaseRepository<E::Doc, Uuid> for PostgresCollection<E>
where
    E: DocumentEntity,
    E::Model: IntoActiveModel<E::ActiveModel> + Send + Sync,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send + Sync,
    E::PrimaryKey: PrimaryKeyTrait<ValueType = Uuid>,
{
    async fn find_by_id(&self, id: Uuid) -> Result<Option<E::Doc>, RepoError> {
        self.load(id).await
    }

    async fn save(&self, entity: E::Doc) -> Result<E::Doc, RepoError> {
        let exists = E::find_by_id(entity.id())
            .one(&self.db)
            .await
            .map_err(query_err)?
            .is_some();

        let active = E::encode(&entity)?;
        let model = if exists {
            active.update(&self.db).await
        } else {
            active.insert(&self.db).await
        }
        .map_err(query_err)?;

        E::decode(model)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = E::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(query_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}

#[async_trait]
impl<E> PostCollection for PostgresCollection<E>
where
    E: DocumentEntity,
    E::Model: IntoActiveModel<E::ActiveModel> + Send + Sync,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send + Sync,
    E::PrimaryKey: PrimaryKeyTrait<ValueType = Uuid>,
{
    fn kind(&self) -> ParentKind {
        <E::Doc as Document>::KIND
    }

    async fn parent_exists(&self, parent_id: Uuid) -> Result<bool, RepoError> {
        let row = E::find_by_id(parent_id)
            .one(&self.db)
            .await
            .map_err(query_err)?;
        Ok(row.is_some())
    }

    async fn find_post(&self, parent_id: Uuid, post_id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self
            .load(parent_id)
            .await?
            .and_then(|doc| doc.post(post_id).cloned()))
    }

    async fn posts_page(
        &self,
        parent_id: Uuid,
        skip: usize,
        limit: usize,
    ) -> Result<Option<PostPage>, RepoError> {
        Ok(self.load(parent_id).await?.map(|doc| PostPage {
            posts: doc.posts().iter().skip(skip).take(limit).cloned().collect(),
            total: doc.posts().len(),
        }))
    }

    async fn push_post(&self, parent_id: Uuid, post: Post) -> Result<bool, RepoError> {
        let pushed = self
            .modify(parent_id, move |doc| {
                if doc.post(post.id).is_some() {
                    return ((), false);
                }
                doc.posts_mut().push(post);
                ((), true)
            })
            .await?;
        Ok(pushed.is_some())
    }

    async fn update_post(
        &self,
        parent_id: Uuid,
        post_id: Uuid,
        update: &PostUpdate,
    ) -> Result<Option<Post>, RepoError> {
        let updated = self
            .modify(parent_id, |doc| match doc.post_mut(post_id) {
                Some(post) => {
                    update.apply(post);
                    (Some(post.clone()), true)
                }
                None => (None, false),
            })
            .await?;
        Ok(updated.flatten())
    }

    async fn pull_post(&self, parent_id: Uuid, post_id: Uuid) -> Result<Option<Post>, RepoError> {
        let removed = self
            .modify(parent_id, |doc| {
                let posts = doc.posts_mut();
                match posts.iter().position(|p| p.id == post_id) {
                    Some(idx) => (Some(posts.remove(idx)), true),
                    None => (None, false),
                }
            })
            .await?;
        Ok(removed.flatten())
    }
}
