use burn::tensor::backend::Backend;
use burn::tensor::{Data, ElementConversion, Shape, Tensor};
use num_traits::ToPrimitive;

/// Creates a float tensor (vector) holding `values`, converted to the backend's element type.
pub fn tensor_from_f64s<B: Backend>(values: &[f64], device: &B::Device) -> Tensor<B, 1> {
    let elems: Vec<B::FloatElem> = values.iter().map(|&value| value.elem()).collect();
    let data = Data::new(elems, Shape::new([values.len()]));

    Tensor::from_data(data, device)
}

/// Reads a float tensor (vector) back as `f64`s.
pub fn tensor_to_f64s<B: Backend>(tensor: Tensor<B, 1>) -> Vec<f64> {
    tensor
        .into_data()
        .value
        .iter()
        .map(|elem| elem.to_f64().unwrap_or(f64::NAN))
        .collect()
}

#[cfg(all(test, feature = "ndarray"))]
mod tests {
    use super::*;
    use crate::TestBackend;

    #[test]
    fn test_tensor_round_trip() {
        let device = Default::default();
        let values = [0.5, 0.25, 0.125];

        let tensor = tensor_from_f64s::<TestBackend>(&values, &device);
        assert_eq!(tensor.shape(), Shape::from([3]));
        assert_eq!(tensor_to_f64s(tensor), values.to_vec());
    }
}
