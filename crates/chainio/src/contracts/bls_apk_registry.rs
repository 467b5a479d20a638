use alloy_sol_types::sol;

sol! {
    #[derive(Debug, PartialEq, Eq)]
    #[sol(rpc, abi)]
    interface IBLSApkRegistry {
        struct G1Point {
            uint256 X;
            uint256 Y;
        }

        /// Encoding of field elements is: X[0] * i + X[1]
        struct G2Point {
            uint256[2] X;
            uint256[2] Y;
        }

        /**
         * @notice Emitted when `operator` registers with the public keys `pubkeyG1` and `pubkeyG2`.
         */
        event NewPubkeyRegistration(address indexed operator, G1Point pubkeyG1, G2Point pubkeyG2);
    }
}
