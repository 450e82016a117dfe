//! Feedback repository.

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::*;

use super::contains_ignore_case;
use crate::entity::{candidate, feedback, job_record};
use crate::error::{AppError, AppResult, FieldErrors, db_error};
use crate::models::validation::INVALID_CHOICE;
use crate::models::{Feedback, NewFeedback};
use crate::services::listing::{ListingPage, ListingQuery, ListingSpec};

/// One page of feedback. Search, rating filter, sort and paging run in SQL.
pub async fn list_page<C: ConnectionTrait>(
    db: &C,
    spec: &ListingSpec,
    query: &ListingQuery,
) -> AppResult<ListingPage<Feedback>> {
    let mut select = feedback::Entity::find();

    if let Some(needle) = &query.search {
        let mut matches = Condition::any();
        for field in spec.search_fields {
            if *field == "comment" {
                matches = matches.add(contains_ignore_case(
                    Expr::col((feedback::Entity, feedback::Column::Comment)),
                    needle,
                ));
            }
        }
        select = select.filter(matches);
    }
    if let Some(min) = query.min_rating {
        select = select.filter(feedback::Column::Rating.gte(min));
    }

    let order = if query.sort.descending {
        Order::Desc
    } else {
        Order::Asc
    };
    select = match query.sort.field.as_str() {
        "rating" => select.order_by(feedback::Column::Rating, order),
        _ => select.order_by(feedback::Column::CreatedAt, order),
    }
    .order_by_asc(feedback::Column::Id);

    let total_count = select
        .clone()
        .count(db)
        .await
        .map_err(db_error("Failed to count feedback"))? as usize;
    let window = query.window(total_count);
    let rows = select
        .offset(window.offset())
        .limit(window.limit())
        .all(db)
        .await
        .map_err(db_error("Failed to list feedback"))?;

    let items = rows.into_iter().map(Feedback::from).collect();
    Ok(ListingPage::new(items, total_count, &window, query))
}

/// Feedback on any job record of the given title, at or above `min_rating`.
pub async fn list_for_job_title<C: ConnectionTrait>(
    db: &C,
    job_title_id: i32,
    min_rating: Option<i32>,
) -> AppResult<Vec<Feedback>> {
    let mut select = feedback::Entity::find()
        .inner_join(job_record::Entity)
        .filter(job_record::Column::JobTitleId.eq(job_title_id));
    if let Some(min) = min_rating {
        select = select.filter(feedback::Column::Rating.gte(min));
    }
    let rows = select
        .order_by_asc(feedback::Column::Id)
        .all(db)
        .await
        .map_err(db_error("Failed to list feedback for job title"))?;
    Ok(rows.into_iter().map(Feedback::from).collect())
}

pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<Option<Feedback>> {
    let row = feedback::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(db_error("Failed to get feedback"))?;
    Ok(row.map(Feedback::from))
}

async fn check_references<C: ConnectionTrait>(db: &C, new: &NewFeedback) -> AppResult<()> {
    let mut errors = FieldErrors::new();
    if job_record::Entity::find_by_id(new.job_id).one(db).await?.is_none() {
        errors.add("job", INVALID_CHOICE);
    }
    if candidate::Entity::find_by_id(new.author_id)
        .one(db)
        .await?
        .is_none()
    {
        errors.add("author", INVALID_CHOICE);
    }
    errors.into_result()
}

/// Insert feedback; `created_at` is stamped here and never changes afterwards.
pub async fn insert<C: ConnectionTrait>(db: &C, new: &NewFeedback) -> AppResult<Feedback> {
    check_references(db, new).await?;
    let model = feedback::ActiveModel {
        job_id: Set(new.job_id),
        author_id: Set(new.author_id),
        comment: Set(new.comment.clone()),
        rating: Set(new.rating),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(db_error("Failed to insert feedback"))?;
    Ok(model.into())
}

pub async fn update<C: ConnectionTrait>(db: &C, id: i32, new: &NewFeedback) -> AppResult<Feedback> {
    let existing = feedback::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Feedback {}", id)))?;
    check_references(db, new).await?;
    let mut active: feedback::ActiveModel = existing.into();
    active.job_id = Set(new.job_id);
    active.author_id = Set(new.author_id);
    active.comment = Set(new.comment.clone());
    active.rating = Set(new.rating);
    let model = active
        .update(db)
        .await
        .map_err(db_error("Failed to update feedback"))?;
    Ok(model.into())
}

pub async fn delete<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<bool> {
    let result = feedback::Entity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(db_error("Failed to delete feedback"))?;
    Ok(result.rows_affected > 0)
}
