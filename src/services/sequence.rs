// src/services/sequence.rs

use crate::{common::error::AppError, db::Session};

/// Próximo número do ano: maior existente + 1, ou 1.
/// Precisa rodar na mesma sessão do INSERT da fatura (a sessão serializa o ano).
pub async fn next_sequence(session: &mut dyn Session, year: i32) -> Result<i32, AppError> {
    let last = session.last_sequence(year).await?;
    Ok(last.map_or(1, |n| n + 1))
}
