use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::calendar::{count_weekends_and_holidays, CalendarError, DayCounts};
use crate::server::api::{Cell, PredictionRequest};
use crate::traits::calendar::HolidayCalendar;
use crate::traits::features::{Column, FeatureError, FeatureTable, FEATURE_NAMES};
use crate::traits::model::{Model, ModelError};

/// Errors raised while turning a request into predictions
#[derive(Error, Debug)]
pub enum PredictError {
    #[error(transparent)]
    Calendar(#[from] CalendarError),
    #[error(transparent)]
    Feature(#[from] FeatureError),
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Turns shipment batches into model input and runs inference
pub struct Predictor {
    model: Arc<dyn Model>,
    calendar: Arc<dyn HolidayCalendar>,
}

impl Predictor {
    pub fn new(model: Arc<dyn Model>, calendar: Arc<dyn HolidayCalendar>) -> Self {
        Self { model, calendar }
    }

    pub fn model(&self) -> &dyn Model {
        self.model.as_ref()
    }

    /// Build the feature table for a request.
    ///
    /// Weekend and holiday counts come from the first shipment's dates only
    /// and are repeated on every row of the batch.
    pub fn build_table(&self, request: &PredictionRequest) -> Result<(FeatureTable, DayCounts), PredictError> {
        let shipment_date = first(&request.shipment_date, "SHIPMENT_DATE")?;
        let expected_date = first(&request.expected_date, "EXPECTED_DATE")?;
        let counts = count_weekends_and_holidays(self.calendar.as_ref(), shipment_date, expected_date)?;

        let columns = [
            (FEATURE_NAMES[0], numeric(FEATURE_NAMES[0], &request.no_of_items)?),
            (FEATURE_NAMES[1], numeric(FEATURE_NAMES[1], &request.expected_delivery_days)?),
            (FEATURE_NAMES[2], numeric(FEATURE_NAMES[2], &request.distance_km)?),
            (FEATURE_NAMES[3], Column::Broadcast(f64::from(counts.weekends))),
            (FEATURE_NAMES[4], Column::Broadcast(f64::from(counts.holidays))),
            (FEATURE_NAMES[5], numeric(FEATURE_NAMES[5], &request.type_of_item_express_documents)?),
            (FEATURE_NAMES[6], numeric(FEATURE_NAMES[6], &request.type_of_item_others)?),
            (FEATURE_NAMES[7], numeric(FEATURE_NAMES[7], &request.type_of_item_packages_and_parcels)?),
        ];

        let table = FeatureTable::from_columns(&columns)?;
        debug!(rows = table.n_rows(), table = ?table.as_array(), "input table");

        Ok((table, counts))
    }

    /// Predict one value per shipment in the request
    pub fn predict(&self, request: &PredictionRequest) -> Result<Vec<f64>, PredictError> {
        let (table, _) = self.build_table(request)?;
        Ok(self.model.predict(&table)?)
    }
}

fn first<'a>(values: &'a [String], column: &str) -> Result<&'a str, FeatureError> {
    values
        .first()
        .map(String::as_str)
        .ok_or_else(|| FeatureError::EmptyColumn(column.to_string()))
}

fn numeric(column: &str, cells: &[Cell]) -> Result<Column, FeatureError> {
    let values = cells
        .iter()
        .enumerate()
        .map(|(row, cell)| {
            cell.as_f64().ok_or_else(|| FeatureError::NotNumeric {
                column: column.to_string(),
                row,
                value: match cell {
                    Cell::Text(text) => text.clone(),
                    other => format!("{:?}", other),
                },
            })
        })
        .collect::<Result<Vec<f64>, FeatureError>>()?;
    Ok(Column::Values(values))
}
