//! Transactions over one adapter connection.

use crate::context::Context;
use crate::dialect::Dialect;
use crate::error::{Error, Result};
use crate::exec::{Adapter, Rows};
use crate::quarry_trace_tx;
use crate::value::Value;

/// A transaction wrapping one underlying connection.
///
/// `commit()` sets the committed flag, `rollback()` clears the
/// rollback-needed flag, and dropping an unfinished transaction rolls it
/// back — a safe no-op when already committed or rolled back.
///
/// `Tx` implements [`Adapter`], so repository operations run inside the
/// transaction by passing `&tx` where an adapter is expected. Nested
/// transactions are rejected.
pub struct Tx<'a> {
    db: &'a dyn Adapter,
    ctx: Context,
    committed: bool,
    rolled_back: bool,
}

/// Begins a transaction on the given adapter.
pub fn begin<'a>(db: &'a dyn Adapter, ctx: &Context) -> Result<Tx<'a>> {
    db.begin(ctx)?;
    quarry_trace_tx!("begin");
    Ok(Tx {
        db,
        ctx: ctx.clone(),
        committed: false,
        rolled_back: false,
    })
}

/// Runs `f` inside a transaction: commits on success, rolls back on error.
pub fn with_tx<'a, T>(
    db: &'a dyn Adapter,
    ctx: &Context,
    f: impl FnOnce(&Tx<'a>) -> Result<T>,
) -> Result<T> {
    let mut tx = begin(db, ctx)?;
    let out = f(&tx)?;
    Tx::commit(&mut tx)?;
    Ok(out)
}

impl<'a> Tx<'a> {
    pub fn commit(&mut self) -> Result<()> {
        if self.committed {
            return Err(Error::Transaction("already committed".into()));
        }
        if self.rolled_back {
            return Err(Error::Transaction("already rolled back".into()));
        }
        self.db.commit(&self.ctx)?;
        self.committed = true;
        quarry_trace_tx!("commit");
        Ok(())
    }

    pub fn rollback(&mut self) -> Result<()> {
        if self.committed {
            return Err(Error::Transaction("already committed".into()));
        }
        if self.rolled_back {
            return Err(Error::Transaction("already rolled back".into()));
        }
        self.db.rollback(&self.ctx)?;
        self.rolled_back = true;
        quarry_trace_tx!("rollback");
        Ok(())
    }

    #[inline]
    pub fn is_committed(&self) -> bool {
        self.committed
    }

    #[inline]
    pub fn is_rolled_back(&self) -> bool {
        self.rolled_back
    }

    /// Rolls back unless the transaction already finished. Invoked from
    /// `Drop`; also callable explicitly for an early scoped cleanup.
    pub fn finish(&mut self) {
        if self.committed || self.rolled_back {
            return;
        }
        match self.db.rollback(&self.ctx) {
            Ok(()) => {
                self.rolled_back = true;
                quarry_trace_tx!("rollback");
            }
            Err(_err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %_err, "quarry.transaction rollback failed");
            }
        }
    }
}

impl Drop for Tx<'_> {
    fn drop(&mut self) {
        self.finish();
    }
}

impl Adapter for Tx<'_> {
    fn dialect(&self) -> Dialect {
        self.db.dialect()
    }

    fn execute(&self, ctx: &Context, sql: &str, params: &[Value]) -> Result<u64> {
        self.db.execute(ctx, sql, params)
    }

    fn query<'b>(
        &'b self,
        ctx: &Context,
        sql: &str,
        params: &[Value],
    ) -> Result<Box<dyn Rows + 'b>> {
        self.db.query(ctx, sql, params)
    }

    fn begin(&self, _ctx: &Context) -> Result<()> {
        Err(Error::Transaction(
            "nested transactions are not supported".into(),
        ))
    }

    fn commit(&self, _ctx: &Context) -> Result<()> {
        Err(Error::Transaction(
            "commit through Tx::commit, not the adapter".into(),
        ))
    }

    fn rollback(&self, _ctx: &Context) -> Result<()> {
        Err(Error::Transaction(
            "roll back through Tx::rollback, not the adapter".into(),
        ))
    }
}
