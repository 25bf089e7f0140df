use serde::Deserialize;

/// Search filter for the lote catalog, deserialized straight from query
/// parameters. Every value is bound as a parameter; nothing from the client
/// is interpolated into SQL text.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoteFilter {
    pub barrio: Option<String>,
    pub estado: Option<String>,
    pub origen: Option<String>,
    pub tipo: Option<String>,
    pub agente: Option<String>,
    pub area_min: Option<f64>,
    pub area_max: Option<f64>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug)]
pub enum FilterError {
    InvalidRange(String),
    InvalidLimit(String),
    InvalidOffset(String),
}

impl std::fmt::Display for FilterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterError::InvalidRange(msg) => write!(f, "invalid range: {}", msg),
            FilterError::InvalidLimit(msg) => write!(f, "invalid limit: {}", msg),
            FilterError::InvalidOffset(msg) => write!(f, "invalid offset: {}", msg),
        }
    }
}

impl std::error::Error for FilterError {}

/// Bound parameter value for the generated WHERE clause
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Text(String),
    Float(f64),
}

/// Generated WHERE clause plus its ordered parameters. Limit and offset are
/// validated non-negative integers, safe to write into the query text.
#[derive(Debug)]
pub struct SqlResult {
    pub where_clause: String,
    pub params: Vec<SqlParam>,
    pub limit: i64,
    pub offset: i64,
}

impl LoteFilter {
    pub fn to_sql(&self) -> Result<SqlResult, FilterError> {
        let mut conditions: Vec<String> = Vec::new();
        let mut params: Vec<SqlParam> = Vec::new();

        for (column, value) in [
            ("barrio", &self.barrio),
            ("estado", &self.estado),
            ("origen", &self.origen),
            ("tipo", &self.tipo),
        ] {
            if let Some(value) = value {
                params.push(SqlParam::Text(value.clone()));
                conditions.push(format!("\"{}\" = ${}", column, params.len()));
            }
        }

        // Agent references on listings are matched case-insensitively
        if let Some(agente) = &self.agente {
            params.push(SqlParam::Text(agente.clone()));
            conditions.push(format!("LOWER(\"agente\") = LOWER(${})", params.len()));
        }

        if let Some(min) = self.area_min {
            Self::validate_bound("area_min", min)?;
            params.push(SqlParam::Float(min));
            conditions.push(format!("\"area\" >= ${}", params.len()));
        }
        if let Some(max) = self.area_max {
            Self::validate_bound("area_max", max)?;
            params.push(SqlParam::Float(max));
            conditions.push(format!("\"area\" <= ${}", params.len()));
        }
        if let (Some(min), Some(max)) = (self.area_min, self.area_max) {
            if min > max {
                return Err(FilterError::InvalidRange("area_min exceeds area_max".to_string()));
            }
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            conditions.join(" AND ")
        };

        Ok(SqlResult {
            where_clause,
            params,
            limit: self.applied_limit()?,
            offset: self.applied_offset()?,
        })
    }

    fn applied_limit(&self) -> Result<i64, FilterError> {
        let search = &crate::config::config().search;
        let limit = match self.limit {
            Some(l) if l < 0 => {
                return Err(FilterError::InvalidLimit("limit must be non-negative".to_string()))
            }
            Some(l) => l,
            None => search.default_limit,
        };
        Ok(limit.min(search.max_limit))
    }

    fn applied_offset(&self) -> Result<i64, FilterError> {
        match self.offset {
            Some(o) if o < 0 => Err(FilterError::InvalidOffset("offset must be non-negative".to_string())),
            Some(o) => Ok(o),
            None => Ok(0),
        }
    }

    fn validate_bound(name: &str, value: f64) -> Result<(), FilterError> {
        if !value.is_finite() || value < 0.0 {
            return Err(FilterError::InvalidRange(format!(
                "{} must be a non-negative number",
                name
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_has_no_conditions() {
        let sql = LoteFilter::default().to_sql().unwrap();
        assert!(sql.where_clause.is_empty());
        assert!(sql.params.is_empty());
        assert_eq!(sql.offset, 0);
    }

    #[test]
    fn conditions_are_numbered_in_order() {
        let filter = LoteFilter {
            barrio: Some("Palermo".to_string()),
            estado: Some("disponible".to_string()),
            area_min: Some(100.0),
            ..Default::default()
        };
        let sql = filter.to_sql().unwrap();
        assert_eq!(
            sql.where_clause,
            "\"barrio\" = $1 AND \"estado\" = $2 AND \"area\" >= $3"
        );
        assert_eq!(
            sql.params,
            vec![
                SqlParam::Text("Palermo".to_string()),
                SqlParam::Text("disponible".to_string()),
                SqlParam::Float(100.0),
            ]
        );
    }

    #[test]
    fn agente_matches_case_insensitively() {
        let filter = LoteFilter {
            agente: Some("JPerez".to_string()),
            ..Default::default()
        };
        let sql = filter.to_sql().unwrap();
        assert_eq!(sql.where_clause, "LOWER(\"agente\") = LOWER($1)");
    }

    #[test]
    fn rejects_inverted_area_range() {
        let filter = LoteFilter {
            area_min: Some(500.0),
            area_max: Some(100.0),
            ..Default::default()
        };
        assert!(filter.to_sql().is_err());
    }

    #[test]
    fn rejects_negative_and_non_finite_bounds() {
        let filter = LoteFilter {
            area_min: Some(-1.0),
            ..Default::default()
        };
        assert!(filter.to_sql().is_err());

        let filter = LoteFilter {
            area_max: Some(f64::NAN),
            ..Default::default()
        };
        assert!(filter.to_sql().is_err());
    }

    #[test]
    fn rejects_negative_limit_and_offset() {
        let filter = LoteFilter {
            limit: Some(-1),
            ..Default::default()
        };
        assert!(filter.to_sql().is_err());

        let filter = LoteFilter {
            offset: Some(-5),
            ..Default::default()
        };
        assert!(filter.to_sql().is_err());
    }

    #[test]
    fn limit_is_capped_at_configured_max() {
        let max = crate::config::config().search.max_limit;
        let filter = LoteFilter {
            limit: Some(max + 999),
            ..Default::default()
        };
        let sql = filter.to_sql().unwrap();
        assert_eq!(sql.limit, max);
    }
}
