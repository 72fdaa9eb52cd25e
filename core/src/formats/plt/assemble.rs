use std::sync::Arc;

use ndarray::{Array4, ShapeError};

use super::{err::ZoneDataError, reader::ZoneBlock, zone::GridSchema, Variable};

/// Collects zone blocks into one `(zones, dim1, dim2, dim3)` array per variable.
///
/// Values are appended as zones arrive, the arrays are only shaped in [`Self::finish`].
#[derive(Debug)]
pub struct ArrayAssembler {
    schema: GridSchema,
    points: usize,
    names: Vec<String>,
    values: Vec<Vec<f64>>,
    zone_labels: Vec<String>,
}

impl ArrayAssembler {
    pub fn new(variables: &[String], schema: GridSchema) -> Result<Self, ZoneDataError> {
        Ok(Self {
            schema,
            points: schema.points()?,
            names: variables.to_vec(),
            values: vec![Vec::new(); variables.len()],
            zone_labels: Vec::new(),
        })
    }

    pub fn zone_count(&self) -> usize {
        self.zone_labels.len()
    }

    /// Stores `block` as the next zone. Each column has to hold exactly one value per grid point.
    pub fn push(&mut self, block: ZoneBlock) -> Result<(), ZoneDataError> {
        if block.columns.len() != self.names.len() {
            return Err(ZoneDataError::WrongValueCount {
                got: block.columns.len(),
                expected: self.names.len(),
            });
        }
        if let Some(column) = block.columns.iter().find(|c| c.len() != self.points) {
            return Err(ZoneDataError::PointCount {
                got: column.len(),
                expected: self.points,
            });
        }

        for (values, mut column) in self.values.iter_mut().zip(block.columns) {
            values.append(&mut column);
        }
        self.zone_labels.push(block.label);
        Ok(())
    }

    /// Shapes the collected values row-major into one record per variable,
    /// all sharing the same comments and zone labels.
    pub fn finish(self, comments: Vec<String>) -> Result<Vec<Variable>, ShapeError> {
        let GridSchema { dim1, dim2, dim3 } = self.schema;
        let shape = (self.zone_labels.len(), dim1, dim2, dim3);

        let comments: Arc<[String]> = comments.into();
        let zone_labels: Arc<[String]> = self.zone_labels.into();

        self.names
            .into_iter()
            .zip(self.values)
            .map(|(name, values)| -> Result<Variable, ShapeError> {
                Ok(Variable {
                    name,
                    data: Array4::from_shape_vec(shape, values)?.into_dyn(),
                    size1: dim1,
                    size2: dim2,
                    size3: dim3,
                    comments: Arc::clone(&comments),
                    zone_labels: Arc::clone(&zone_labels),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use ndarray::Ix4;

    use super::*;

    fn block(label: &str, columns: Vec<Vec<f64>>) -> ZoneBlock {
        ZoneBlock {
            label: label.to_string(),
            columns,
        }
    }

    #[test]
    fn fills_row_major() {
        let names = ["A".to_string(), "B".to_string()];
        let mut asm = ArrayAssembler::new(&names, GridSchema::new(2, 2, 1)).unwrap();
        asm.push(block("z0", vec![vec![1., 2., 3., 4.], vec![5., 6., 7., 8.]]))
            .unwrap();
        asm.push(block("z3", vec![vec![9., 10., 11., 12.], vec![0.; 4]]))
            .unwrap();
        assert_eq!(asm.zone_count(), 2);

        let vars = asm.finish(vec!["# c".to_string()]).unwrap();
        assert_eq!(vars.len(), 2);

        let a = &vars[0];
        assert_eq!(a.name, "A");
        assert_eq!(a.data.shape(), &[2, 2, 2, 1]);
        let arr = a.data.view().into_dimensionality::<Ix4>().unwrap();
        assert_eq!(arr[[0, 0, 0, 0]], 1.);
        assert_eq!(arr[[0, 0, 1, 0]], 2.);
        assert_eq!(arr[[0, 1, 0, 0]], 3.);
        assert_eq!(arr[[1, 1, 1, 0]], 12.);
        let b = vars[1].data.view().into_dimensionality::<Ix4>().unwrap();
        assert_eq!(b[[0, 1, 1, 0]], 8.);

        assert_eq!(&*a.zone_labels, ["z0", "z3"]);
        assert!(Arc::ptr_eq(&vars[0].comments, &vars[1].comments));
        assert!(Arc::ptr_eq(&vars[0].zone_labels, &vars[1].zone_labels));
    }

    #[test]
    fn rejects_wrong_length() {
        let names = ["A".to_string()];
        let mut asm = ArrayAssembler::new(&names, GridSchema::new(2, 2, 1)).unwrap();
        assert!(matches!(
            asm.push(block("z0", vec![vec![1., 2., 3.]])),
            Err(ZoneDataError::PointCount {
                got: 3,
                expected: 4
            })
        ));
        // Nothing of the rejected zone is kept
        assert_eq!(asm.zone_count(), 0);
        assert!(asm.finish(Vec::new()).unwrap()[0].data.is_empty());
    }

    #[test]
    fn rejects_wrong_column_count() {
        let names = ["A".to_string(), "B".to_string()];
        let mut asm = ArrayAssembler::new(&names, GridSchema::new(1, 1, 1)).unwrap();
        assert!(matches!(
            asm.push(block("z0", vec![vec![1.]])),
            Err(ZoneDataError::WrongValueCount {
                got: 1,
                expected: 2
            })
        ));
    }

    #[test]
    fn rejects_oversized_schema() {
        let names = ["A".to_string()];
        assert!(matches!(
            ArrayAssembler::new(&names, GridSchema::new(usize::MAX, 2, 1)),
            Err(ZoneDataError::GridTooLarge { .. })
        ));
    }
}
