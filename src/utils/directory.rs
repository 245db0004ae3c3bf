use sqlx::MySqlPool;

/// Lookups against the externally-owned employee directory. This service
/// reads only what routing and authorization need.

/// Department the employee belongs to, if the employee exists.
pub async fn employee_department(
    pool: &MySqlPool,
    employee_id: u64,
) -> Result<Option<u64>, sqlx::Error> {
    let row = sqlx::query_as::<_, (u64,)>(
        r#"
        SELECT department_id
        FROM employees
        WHERE id = ?
        "#,
    )
    .bind(employee_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|(department_id,)| department_id))
}

/// Employees flagged as heads of the given department; these become the
/// eligible first-stage approvers of a new request.
pub async fn dept_head_ids(
    pool: &MySqlPool,
    department_id: u64,
) -> Result<Vec<u64>, sqlx::Error> {
    let rows = sqlx::query_as::<_, (u64,)>(
        r#"
        SELECT id
        FROM employees
        WHERE department_id = ? AND is_dept_head = 1
        "#,
    )
    .bind(department_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|(id,)| id).collect())
}
