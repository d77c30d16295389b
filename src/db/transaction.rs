/*!
 * Transaction helper
 *
 * Runs a closure inside a database transaction: commit on `Ok`, rollback on `Err`.
 */

use metrics::counter;
use sea_orm::{DatabaseConnection, DatabaseTransaction, DbErr, TransactionError, TransactionTrait};
use std::future::Future;
use std::pin::Pin;

/// Type alias for boxed future used in transactions
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Execute a function within a database transaction
///
/// The closure's own error type is preserved; connection-level failures are
/// converted through `From<DbErr>`.
///
/// ```rust,ignore
/// let saved = with_transaction(&db, |txn| {
///     Box::pin(async move {
///         let product = product::ActiveModel { .. }.insert(txn).await?;
///         product_category::Entity::insert_many(rows).exec(txn).await?;
///         Ok(product)
///     })
/// })
/// .await?;
/// ```
pub async fn with_transaction<F, T, E>(db: &DatabaseConnection, f: F) -> Result<T, E>
where
    F: for<'a> FnOnce(&'a DatabaseTransaction) -> BoxFuture<'a, Result<T, E>> + Send,
    T: Send,
    E: std::error::Error + From<DbErr> + Send,
{
    let result = db.transaction::<_, T, E>(f).await;

    match &result {
        Ok(_) => {
            counter!("catalog_db.transaction.committed", 1);
        }
        Err(_) => {
            counter!("catalog_db.transaction.rolled_back", 1);
        }
    }

    result.map_err(|e| match e {
        TransactionError::Connection(db_err) => E::from(db_err),
        TransactionError::Transaction(err) => err,
    })
}
