//! BOM 展開：由根 BOM 逐層產生製令

use chrono::NaiveDateTime;
use mfg_core::{
    BillOfMaterial, ManufOrderOrigin, ManufacturingOrder, MasterData, MfgError, ProductionConfig,
    WorkCalendar,
};
use rust_decimal::Decimal;

use crate::ExplosionOutcome;

/// 待展開節點：BOM、其累積數量與由根到此的 BOM 路徑
#[derive(Debug, Clone)]
struct FrontierNode<'a> {
    bom: &'a BillOfMaterial,
    qty: Decimal,
    path: Vec<&'a str>,
}

impl<'a> FrontierNode<'a> {
    fn on_path(&self, bom_id: &str) -> bool {
        self.path.iter().any(|id| *id == bom_id)
    }
}

/// 單層展開結果
struct LevelOutcome<'a> {
    manuf_orders: Vec<ManufacturingOrder>,
    skipped_boms: Vec<String>,
    next_frontier: Vec<FrontierNode<'a>>,
}

/// BOM 展開器
///
/// 廣度優先逐層展開：每層為前沿中每個有製程的 BOM 產生一張製令，
/// 並把標記為子 BOM 的子件（數量 = 本節點數量 × 子件用量）放入下一層前沿。
/// 子 BOM 已出現在自身路徑上，或層數達到 `max_bom_depth` 而前沿仍非空時，
/// 視為 BOM 循環並回傳配置錯誤。
pub struct BomExplosion<'a> {
    master: &'a MasterData,
    calendar: &'a WorkCalendar,
    config: &'a ProductionConfig,
}

impl<'a> BomExplosion<'a> {
    /// 創建新的展開器
    pub fn new(
        master: &'a MasterData,
        calendar: &'a WorkCalendar,
        config: &'a ProductionConfig,
    ) -> Self {
        Self {
            master,
            calendar,
            config,
        }
    }

    /// 展開根 BOM
    ///
    /// 根節點的製令數量即為 `requested_qty`（已換算為產品庫存單位）。
    /// 發生錯誤時不回傳任何製令。
    pub fn explode(
        &self,
        root: &'a BillOfMaterial,
        requested_qty: Decimal,
        start: NaiveDateTime,
        origin: &ManufOrderOrigin,
    ) -> mfg_core::Result<ExplosionOutcome> {
        if requested_qty <= Decimal::ZERO {
            return Err(MfgError::Validation(format!(
                "BOM {} 的需求數量必須大於 0，實際為 {}",
                root.id, requested_qty
            )));
        }

        tracing::info!(
            "開始 BOM 展開：{} 數量 {}，來源 {}",
            root.id,
            requested_qty,
            origin.sale_order_ref
        );

        let mut frontier = vec![FrontierNode {
            bom: root,
            qty: requested_qty,
            path: vec![root.id.as_str()],
        }];
        let mut depth: u32 = 0;
        let mut outcome = ExplosionOutcome::empty();

        while !frontier.is_empty() {
            if depth >= self.config.max_bom_depth {
                tracing::error!(
                    "BOM {} 展開達 {} 層仍未結束，前沿尚有 {} 個節點",
                    root.id,
                    depth,
                    frontier.len()
                );
                return Err(MfgError::BomDepthExceeded {
                    bom_id: root.id.clone(),
                    max_depth: self.config.max_bom_depth,
                });
            }

            let level = self.explode_level(root, &frontier, depth, start, origin)?;
            tracing::debug!(
                "第 {} 層：節點 {}，製令 {}，下一層 {}",
                depth,
                frontier.len(),
                level.manuf_orders.len(),
                level.next_frontier.len()
            );

            outcome.manuf_orders.extend(level.manuf_orders);
            outcome.skipped_boms.extend(level.skipped_boms);
            frontier = level.next_frontier;
            depth += 1;
        }

        outcome.depth_reached = depth;

        tracing::info!(
            "BOM {} 展開完成：{} 層，製令 {} 張",
            root.id,
            depth,
            outcome.manuf_order_count()
        );

        Ok(outcome)
    }

    /// 展開單一層
    fn explode_level(
        &self,
        root: &BillOfMaterial,
        frontier: &[FrontierNode<'a>],
        depth: u32,
        start: NaiveDateTime,
        origin: &ManufOrderOrigin,
    ) -> mfg_core::Result<LevelOutcome<'a>> {
        let mut level = LevelOutcome {
            manuf_orders: Vec::new(),
            skipped_boms: Vec::new(),
            next_frontier: Vec::new(),
        };

        for node in frontier {
            match self.manuf_order_for(node, depth, start, origin)? {
                Some(manuf_order) => level.manuf_orders.push(manuf_order),
                None => {
                    tracing::debug!("BOM {} 沒有製程，略過", node.bom.id);
                    level.skipped_boms.push(node.bom.id.clone());
                }
            }

            for child_id in &node.bom.children {
                let child = self.master.bom(child_id)?;
                if !child.define_sub_bom {
                    continue;
                }

                if node.on_path(&child.id) {
                    tracing::error!(
                        "BOM {} 循環：{} → {}",
                        root.id,
                        node.path.join(" → "),
                        child.id
                    );
                    return Err(MfgError::BomDepthExceeded {
                        bom_id: root.id.clone(),
                        max_depth: self.config.max_bom_depth,
                    });
                }

                let qty = node.qty.checked_mul(child.qty).ok_or_else(|| {
                    MfgError::ConfigInvalid(format!(
                        "BOM {} → {} 數量溢出",
                        node.bom.id, child.id
                    ))
                })?;

                let mut path = node.path.clone();
                path.push(child.id.as_str());
                level.next_frontier.push(FrontierNode {
                    bom: child,
                    qty,
                    path,
                });
            }
        }

        Ok(level)
    }

    /// 為單一節點建立製令；沒有製程時回傳 None
    fn manuf_order_for(
        &self,
        node: &FrontierNode<'a>,
        depth: u32,
        start: NaiveDateTime,
        origin: &ManufOrderOrigin,
    ) -> mfg_core::Result<Option<ManufacturingOrder>> {
        let Some(process) = &node.bom.prod_process else {
            return Ok(None);
        };

        let planned_end = self.calendar.schedule_end(start, process.lead_time_days)?;

        let mut manuf_order = ManufacturingOrder::new(
            node.bom.product_id.clone(),
            node.bom.id.clone(),
            process.id.clone(),
            node.qty,
            node.bom.unit.clone(),
            start,
            origin.clone(),
        )
        .with_depth(depth)
        .with_planned_end(planned_end);

        if self.config.auto_plan_manuf_orders {
            manuf_order.plan();
        }

        Ok(Some(manuf_order))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use mfg_core::{ErrorCategory, ManufOrderStatus, ProdProcess};
    use proptest::prelude::*;
    use uuid::Uuid;

    fn process(id: &str) -> ProdProcess {
        ProdProcess::new(id, id, 2)
    }

    fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 11, 3)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    fn origin() -> ManufOrderOrigin {
        ManufOrderOrigin::new(Uuid::new_v4(), "SO-TEST")
    }

    fn explode(
        master: &MasterData,
        config: &ProductionConfig,
        root_id: &str,
        qty: Decimal,
    ) -> mfg_core::Result<ExplosionOutcome> {
        let calendar = WorkCalendar::fallback_calendar();
        let root = master.bom(root_id)?;
        BomExplosion::new(master, &calendar, config).explode(root, qty, start(), &origin())
    }

    fn qty_of(outcome: &ExplosionOutcome, bom_id: &str) -> Vec<Decimal> {
        outcome.orders_for_bom(bom_id).map(|mo| mo.qty).collect()
    }

    #[test]
    fn test_two_sub_boms() {
        // 根 10，兩個子 BOM 用量 2 與 3
        let master = MasterData::new().with_boms([
            BillOfMaterial::new("ROOT", "BIKE", "pc")
                .with_process(process("ASSY"))
                .with_children(["CHILD-1", "CHILD-2"]),
            BillOfMaterial::new("CHILD-1", "FRAME", "pc")
                .with_qty(Decimal::from(2))
                .with_process(process("WELD"))
                .as_sub_bom(),
            BillOfMaterial::new("CHILD-2", "WHEEL", "pc")
                .with_qty(Decimal::from(3))
                .with_process(process("LACE"))
                .as_sub_bom(),
        ]);

        let outcome = explode(&master, &ProductionConfig::default(), "ROOT", Decimal::from(10)).unwrap();

        assert_eq!(outcome.manuf_order_count(), 3);
        assert_eq!(outcome.depth_reached, 2);
        assert_eq!(qty_of(&outcome, "ROOT"), vec![Decimal::from(10)]);
        assert_eq!(qty_of(&outcome, "CHILD-1"), vec![Decimal::from(20)]);
        assert_eq!(qty_of(&outcome, "CHILD-2"), vec![Decimal::from(30)]);

        let child = outcome.orders_for_bom("CHILD-1").next().unwrap();
        assert_eq!(child.depth, 1);
        assert_eq!(child.product_id, "FRAME");
        assert_eq!(child.origin.sale_order_ref, "SO-TEST");
        assert_eq!(child.duration_days(), 2);
        assert_eq!(child.status, ManufOrderStatus::Draft);
    }

    #[test]
    fn test_multiplicative_path() {
        // ROOT → A(×2) → B(×5)，B 的數量 = 4 × 2 × 5
        let master = MasterData::new().with_boms([
            BillOfMaterial::new("ROOT", "P-ROOT", "pc")
                .with_process(process("P0"))
                .with_children(["A"]),
            BillOfMaterial::new("A", "P-A", "pc")
                .with_qty(Decimal::from(2))
                .with_process(process("P1"))
                .as_sub_bom()
                .with_children(["B"]),
            BillOfMaterial::new("B", "P-B", "pc")
                .with_qty(Decimal::from(5))
                .with_process(process("P2"))
                .as_sub_bom(),
        ]);

        let outcome = explode(&master, &ProductionConfig::default(), "ROOT", Decimal::from(4)).unwrap();

        assert_eq!(qty_of(&outcome, "B"), vec![Decimal::from(40)]);
        assert_eq!(outcome.depth_reached, 3);
    }

    #[test]
    fn test_leaf_consumption_not_exploded() {
        // 未標記子 BOM 的子件是直接耗用，不產生製令也不繼續展開
        let master = MasterData::new().with_boms([
            BillOfMaterial::new("ROOT", "P-ROOT", "pc")
                .with_process(process("P0"))
                .with_children(["SCREW", "SUB"]),
            BillOfMaterial::new("SCREW", "P-SCREW", "pc")
                .with_qty(Decimal::from(8))
                .with_process(process("P1"))
                .with_children(["SUB"]),
            BillOfMaterial::new("SUB", "P-SUB", "pc")
                .with_process(process("P2"))
                .as_sub_bom(),
        ]);

        let outcome = explode(&master, &ProductionConfig::default(), "ROOT", Decimal::ONE).unwrap();

        assert_eq!(outcome.manuf_order_count(), 2);
        assert_eq!(qty_of(&outcome, "SCREW"), Vec::<Decimal>::new());
    }

    #[test]
    fn test_node_without_process_is_skipped() {
        let master = MasterData::new().with_boms([
            BillOfMaterial::new("ROOT", "P-ROOT", "pc")
                .with_process(process("P0"))
                .with_children(["NOPROC"]),
            BillOfMaterial::new("NOPROC", "P-NOPROC", "pc")
                .with_qty(Decimal::from(2))
                .as_sub_bom()
                .with_children(["DEEP"]),
            BillOfMaterial::new("DEEP", "P-DEEP", "pc")
                .with_qty(Decimal::from(3))
                .with_process(process("P2"))
                .as_sub_bom(),
        ]);

        let outcome = explode(&master, &ProductionConfig::default(), "ROOT", Decimal::from(10)).unwrap();

        assert_eq!(outcome.manuf_order_count(), 2);
        assert_eq!(outcome.skipped_boms, vec!["NOPROC".to_string()]);
        // 略過的節點仍參與數量累乘
        assert_eq!(qty_of(&outcome, "DEEP"), vec![Decimal::from(60)]);
    }

    #[test]
    fn test_shared_sub_bom_counted_per_path() {
        // 同一子 BOM 出現在兩條路徑上時各產生一張製令
        let master = MasterData::new().with_boms([
            BillOfMaterial::new("ROOT", "P-ROOT", "pc")
                .with_process(process("P0"))
                .with_children(["LEFT", "RIGHT"]),
            BillOfMaterial::new("LEFT", "P-LEFT", "pc")
                .with_qty(Decimal::from(2))
                .with_process(process("P1"))
                .as_sub_bom()
                .with_children(["SHARED"]),
            BillOfMaterial::new("RIGHT", "P-RIGHT", "pc")
                .with_process(process("P1"))
                .as_sub_bom()
                .with_children(["SHARED"]),
            BillOfMaterial::new("SHARED", "P-SHARED", "pc")
                .with_qty(Decimal::from(3))
                .with_process(process("P2"))
                .as_sub_bom(),
        ]);

        let outcome = explode(&master, &ProductionConfig::default(), "ROOT", Decimal::ONE).unwrap();

        let mut shared = qty_of(&outcome, "SHARED");
        shared.sort();
        assert_eq!(shared, vec![Decimal::from(3), Decimal::from(6)]);
    }

    #[test]
    fn test_two_node_cycle() {
        let master = MasterData::new().with_boms([
            BillOfMaterial::new("A", "P-A", "pc")
                .with_process(process("P0"))
                .as_sub_bom()
                .with_children(["B"]),
            BillOfMaterial::new("B", "P-B", "pc")
                .with_process(process("P1"))
                .as_sub_bom()
                .with_children(["A"]),
        ]);

        let err = explode(&master, &ProductionConfig::default(), "A", Decimal::ONE).unwrap_err();

        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(
            err,
            MfgError::BomDepthExceeded {
                bom_id: "A".to_string(),
                max_depth: 100
            }
        );
    }

    #[test]
    fn test_branching_cycle_fails_fast() {
        // A → [B, C]，B 與 C 都連回 A；逐路徑展開時前沿每兩層加倍
        let master = MasterData::new().with_boms([
            BillOfMaterial::new("A", "P-A", "pc")
                .with_process(process("P0"))
                .as_sub_bom()
                .with_children(["B", "C"]),
            BillOfMaterial::new("B", "P-B", "pc")
                .with_process(process("P1"))
                .as_sub_bom()
                .with_children(["A"]),
            BillOfMaterial::new("C", "P-C", "pc")
                .with_process(process("P2"))
                .as_sub_bom()
                .with_children(["A"]),
        ]);

        let err = explode(&master, &ProductionConfig::default(), "A", Decimal::ONE).unwrap_err();

        assert!(err.is_configuration());
        assert_eq!(
            err,
            MfgError::BomDepthExceeded {
                bom_id: "A".to_string(),
                max_depth: 100
            }
        );
    }

    #[test]
    fn test_cycle_below_root_is_detected() {
        // 循環不經過根：ROOT → X → Y → X
        let master = MasterData::new().with_boms([
            BillOfMaterial::new("ROOT", "P-ROOT", "pc")
                .with_process(process("P0"))
                .with_children(["X"]),
            BillOfMaterial::new("X", "P-X", "pc")
                .as_sub_bom()
                .with_children(["Y", "Y"]),
            BillOfMaterial::new("Y", "P-Y", "pc")
                .with_process(process("P1"))
                .as_sub_bom()
                .with_children(["X"]),
        ]);

        let err = explode(&master, &ProductionConfig::default(), "ROOT", Decimal::ONE).unwrap_err();

        assert_eq!(
            err,
            MfgError::BomDepthExceeded {
                bom_id: "ROOT".to_string(),
                max_depth: 100
            }
        );
    }

    #[test]
    fn test_depth_cap_is_configurable() {
        // 三層樹在上限 2 時失敗，上限 3 時成功
        let master = MasterData::new().with_boms([
            BillOfMaterial::new("L0", "P0", "pc")
                .with_process(process("P"))
                .with_children(["L1"]),
            BillOfMaterial::new("L1", "P1", "pc")
                .with_process(process("P"))
                .as_sub_bom()
                .with_children(["L2"]),
            BillOfMaterial::new("L2", "P2", "pc")
                .with_process(process("P"))
                .as_sub_bom(),
        ]);

        let tight = ProductionConfig::new().with_max_bom_depth(2);
        assert!(explode(&master, &tight, "L0", Decimal::ONE)
            .unwrap_err()
            .is_configuration());

        let exact = ProductionConfig::new().with_max_bom_depth(3);
        assert_eq!(
            explode(&master, &exact, "L0", Decimal::ONE)
                .unwrap()
                .manuf_order_count(),
            3
        );
    }

    #[test]
    fn test_unknown_child_bom() {
        let master = MasterData::new().with_boms([BillOfMaterial::new("ROOT", "P-ROOT", "pc")
            .with_process(process("P0"))
            .with_children(["GHOST"])]);

        let err = explode(&master, &ProductionConfig::default(), "ROOT", Decimal::ONE).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::NotFound);
    }

    #[test]
    fn test_non_positive_quantity() {
        let master = MasterData::new().with_boms([
            BillOfMaterial::new("ROOT", "P-ROOT", "pc").with_process(process("P0"))
        ]);

        let err = explode(&master, &ProductionConfig::default(), "ROOT", Decimal::ZERO).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Validation);
    }

    #[test]
    fn test_auto_plan() {
        let master = MasterData::new().with_boms([
            BillOfMaterial::new("ROOT", "P-ROOT", "pc").with_process(process("P0"))
        ]);

        let config = ProductionConfig::new().with_auto_plan(true);
        let outcome = explode(&master, &config, "ROOT", Decimal::ONE).unwrap();

        assert_eq!(outcome.manuf_orders[0].status, ManufOrderStatus::Planned);
    }

    /// 建立一條鏈狀 BOM：CHAIN-0 → CHAIN-1 → ...，每層用量取自 `factors`
    fn chain(factors: &[u32], with_process: &[bool]) -> MasterData {
        let mut master = MasterData::new();
        for (i, factor) in factors.iter().enumerate() {
            let mut bom = BillOfMaterial::new(format!("CHAIN-{}", i), format!("P-{}", i), "pc")
                .with_qty(Decimal::from(*factor));
            if i > 0 {
                bom = bom.as_sub_bom();
            }
            if with_process[i] {
                bom = bom.with_process(process("P"));
            }
            if i + 1 < factors.len() {
                bom = bom.with_children([format!("CHAIN-{}", i + 1)]);
            }
            master.add_bom(bom);
        }
        master
    }

    proptest! {
        #[test]
        fn prop_chain_quantities_are_multiplicative(
            requested in 1u32..1000,
            levels in prop::collection::vec((1u32..10, any::<bool>()), 1..8),
        ) {
            let factors: Vec<u32> = levels.iter().map(|(f, _)| *f).collect();
            let processes: Vec<bool> = levels.iter().map(|(_, p)| *p).collect();
            let master = chain(&factors, &processes);

            let outcome = explode(
                &master,
                &ProductionConfig::default(),
                "CHAIN-0",
                Decimal::from(requested),
            )
            .unwrap();

            prop_assert_eq!(outcome.depth_reached as usize, factors.len());
            prop_assert_eq!(
                outcome.manuf_order_count(),
                processes.iter().filter(|p| **p).count()
            );

            let mut expected = Decimal::from(requested);
            for (i, factor) in factors.iter().enumerate() {
                if i > 0 {
                    expected *= Decimal::from(*factor);
                }
                let bom_id = format!("CHAIN-{}", i);
                let quantities = qty_of(&outcome, &bom_id);
                if processes[i] {
                    prop_assert_eq!(quantities, vec![expected]);
                } else {
                    prop_assert!(quantities.is_empty());
                }
            }
        }
    }
}
