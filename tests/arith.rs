use linfit::Tensor;

#[test]
fn test_transposed_binary_ops() {
    let ops: Vec<fn(&Tensor<f64>, &Tensor<f64>) -> linfit::Result<Tensor<f64>>> =
        vec![Tensor::add, Tensor::sub, Tensor::mul];

    let tensor1 = Tensor::randn(vec![10, 20], 0).transpose();
    let tensor2 = Tensor::randn(vec![20, 10], 1);
    let tensor1_contig = tensor1.clone().contig();

    for op in ops {
        assert_eq!(op(&tensor1_contig, &tensor2).unwrap(), op(&tensor1, &tensor2).unwrap());
    }
}

#[test]
fn test_transposed_unary_ops() {
    let tensor = Tensor::randn(vec![10, 20], 0).transpose();
    let tensor_contig = tensor.clone().contig();

    assert_eq!(tensor_contig.scale(-2.5), tensor.scale(-2.5));
    assert_eq!(tensor_contig.apply_uop(|a| a * a), tensor.apply_uop(|a| a * a));
    assert!((tensor_contig.sum() - tensor.sum()).abs() < 1e-9);
}

#[test]
fn test_randn() {
    for seed in 0..8 {
        let tensor = Tensor::randn(vec![100000], seed);
        let n = tensor.data().len() as f64;
        let mean = tensor.sum() / n;
        let var = tensor.apply_uop(|a| (a - mean) * (a - mean)).sum() / n;

        assert!(mean.abs() < 0.02);
        assert!((var - 1.0).abs() < 0.02);
    }
}

#[test]
fn test_transposed_matmul() {
    let shapes = vec![
        (vec![10, 20], vec![10, 20], true, false),
        (vec![10, 20], vec![10, 20], false, true),
        (vec![10, 20], vec![20, 10], true, true),
    ];

    for (shape1, shape2, transpose1, transpose2) in shapes {
        let mut tensor1 = Tensor::randn(shape1, 0);
        let mut tensor2 = Tensor::randn(shape2, 1);
        if transpose1 {
            tensor1 = tensor1.transpose();
        }
        if transpose2 {
            tensor2 = tensor2.transpose();
        }

        let tensor1_contig = tensor1.clone().contig();
        let tensor2_contig = tensor2.clone().contig();

        assert_eq!(
            tensor1_contig.matmul(&tensor2_contig).unwrap(),
            tensor1.matmul(&tensor2).unwrap()
        );
    }
}

#[test]
fn test_matmul_transpose_identity() {
    // (AB)ᵀ = BᵀAᵀ
    let tensor1 = Tensor::randn(vec![6, 4], 2);
    let tensor2 = Tensor::randn(vec![4, 3], 3);

    let lhs = tensor1.matmul(&tensor2).unwrap().transpose();
    let rhs = tensor2.transpose().matmul(&tensor1.transpose()).unwrap();

    assert_eq!([3, 6], rhs.shape());
    for (a, b) in lhs.to_vec().iter().zip(rhs.to_vec().iter()) {
        assert!((a - b).abs() < 1e-12);
    }
}

#[test]
fn test_dot() {
    let tensor1 = Tensor::vector(vec![1.0, 2.0, 3.0]);
    let tensor2 = Tensor::vector(vec![4.0, -5.0, 6.0]);

    assert_eq!(12.0, tensor1.dot(&tensor2).unwrap());
    assert!(tensor1.dot(&Tensor::vector(vec![1.0])).is_err());
    assert!(Tensor::column(vec![1.0, 2.0, 3.0]).dot(&tensor2).is_err());
}
