//! Localized fixed messages and prompt builders.
//!
//! All user-visible copy is Thai; the prompts ask the generative service to
//! answer in Thai as well.

use crate::{
    models::{Day, HealthProfile, Plan},
    service::DayMeals,
};

/// Greeting shown as the first agent message of every conversation.
pub const GREETING: &str =
    "สวัสดีค่ะ Healthie ยินดีให้บริการค่ะ มีอะไรให้ช่วยเกี่ยวกับแผนสุขภาพของคุณวันนี้คะ?";

/// Shown in place of a reply when the round trip fails.
pub const CHAT_APOLOGY: &str =
    "ขออภัยค่ะ มีข้อผิดพลาดเกิดขึ้น ไม่สามารถตอบคำถามได้ในขณะนี้";

/// Appended by the agent after the user cancels a proposal.
pub const PROPOSAL_CANCELLED: &str = "ได้เลยค่ะ มีอะไรให้ช่วยเหลือเพิ่มเติมไหมคะ?";

/// Installed as a day's rationale when regeneration fails.
pub const RATIONALE_FAILED: &str = "เกิดข้อผิดพลาดในการอัปเดตคำอธิบาย";

/// Notice when the plan could not be written to the store.
pub const SAVE_FAILED: &str = "ไม่สามารถบันทึกแผนได้ พื้นที่จัดเก็บอาจเต็ม";

/// Notice when a saved plan was unreadable and has been removed.
pub const SAVED_PLAN_DISCARDED: &str = "ไม่สามารถโหลดแผนที่บันทึกไว้ได้ แผนดังกล่าวถูกลบแล้ว";

/// Seed text for days whose plan carries no narrative.
pub const MISSING_RATIONALE: &str = "ไม่มีคำอธิบาย";

/// Persona and revision contract for the chat agent.
pub const SYSTEM_INSTRUCTION: &str = r#"คุณคือ 'Healthie' ผู้ช่วยด้านสุขภาพ AI ที่เป็นมิตรและให้กำลังใจจากประเทศไทย วัตถุประสงค์ของคุณคือการช่วยให้ผู้ใช้สูงอายุเข้าใจและปฏิบัติตามแผนสุขภาพส่วนบุคคลของพวกเขา คุณจะได้รับโปรไฟล์สุขภาพของผู้ใช้และแผน 7 วันของพวกเขาเป็นบริบท โปรดใช้ข้อมูลนี้เป็นฐานในการตอบคำถาม ใช้ภาษาไทยที่เรียบง่าย ชัดเจน และให้กำลังใจ คุณสามารถอธิบายส่วนต่างๆ ของแผน แนะนำการปรับเปลี่ยนสูตรง่ายๆ หากถูกถาม อธิบายประโยชน์ของอาหารหรือการออกกำลังกายบางอย่าง และให้กำลังใจโดยทั่วไป อย่าให้คำแนะนำทางการแพทย์ที่ขัดแย้งกับคำสั่งของแพทย์ หากถูกถามเกี่ยวกับหัวข้อที่นอกเหนือจากสุขภาพและความเป็นอยู่ที่ดี ให้นำการสนทนากลับมาที่แผนสุขภาพของพวกเขาอย่างนุ่มนวล

**คำสั่งที่สำคัญที่สุด:** เมื่อผู้ใช้ขอแก้ไขแผนของพวกเขา (เช่น เปลี่ยนอาหาร, เพิ่มการออกกำลังกาย) คุณ **ต้อง** สร้างแผนสุขภาพใหม่ทั้งหมด 7 วันตามคำขอและข้อมูลสุขภาพเดิมทั้งหมดของพวกเขา โดยปฏิบัติตามกฎการสร้างแผนดังนี้:
1.  **แผนอาหาร**: ต้องเหมาะสมกับผู้ใช้และมีความหลากหลาย
2.  **แผนการออกกำลังกาย**: ต้องยึดตามกิจกรรมที่ผู้ใช้สนใจเท่านั้น และสร้างโปรแกรมที่เกี่ยวข้อง 3-5 รูปแบบเป็นตัวเลือกในแต่ละวัน **ห้าม** เพิ่มการออกกำลังกายที่ผู้ใช้ไม่ได้เลือกไว้ในข้อมูลสุขภาพเดิม

คำตอบของคุณสำหรับการแก้ไขแผน **ต้อง** เป็นออบเจ็กต์ JSON ที่ถูกต้องเพียงออบเจ็กต์เดียวซึ่งมีโครงสร้างที่แน่นอนดังนี้:
{
  "responseText": "ข้อความสนทนาที่ยืนยันการเปลี่ยนแปลงและนำเสนอแผนใหม่",
  "newPlan": { ...ออบเจ็กต์แผนทั้งหมดที่ตรงกับสคีมาที่ต้องการ... }
}
สำหรับการสนทนาทั่วไปหรือคำถามอื่นๆ ให้ตอบเป็นข้อความธรรมดาเท่านั้น อย่าห่อหุ้มคำตอบที่เป็นการสนทนาด้วย JSON"#;

fn or_none(text: &str) -> &str {
    if text.trim().is_empty() {
        "ไม่มี"
    } else {
        text
    }
}

/// The user-role context message that opens every conversation.
///
/// # Errors
///
/// Fails only if the profile or plan cannot be serialized.
pub fn context_message(
    profile: &HealthProfile,
    plan: &Plan,
) -> Result<String, serde_json::Error> {
    Ok(format!(
        "นี่คือข้อมูลสุขภาพและแผนของฉัน: \nข้อมูลสุขภาพ: {}\nแผนสุขภาพ: {}\n\nกรุณาตอบคำถามของฉันจากข้อมูลเหล่านี้",
        serde_json::to_string(profile)?,
        serde_json::to_string(plan)?,
    ))
}

/// Prompt for a fresh seven-day plan.
pub fn plan_generation(profile: &HealthProfile) -> String {
    let bmi = profile
        .bmi()
        .map_or_else(|| "N/A".to_string(), |bmi| format!("{bmi:.2}"));

    let medications = profile.active_medications();
    let medication_info = if medications.is_empty() {
        "- ยาที่ใช้ประจำ: ไม่มี".to_string()
    } else {
        let list: Vec<String> = medications
            .iter()
            .map(|m| format!("{} (ขนาด {}, เวลา {})", m.name, m.dosage, m.time))
            .collect();
        format!(
            "- ยาที่ใช้ประจำ: {} (โปรดพิจารณาอาหารที่อาจมีผลกับยาเหล่านี้)",
            list.join(", ")
        )
    };

    let interests = if profile.exercise.is_empty() {
        "ไม่ระบุ".to_string()
    } else {
        profile.exercise.join(", ")
    };

    let mut prompt = String::with_capacity(4096);
    prompt.push_str(
        "คุณคือสุดยอดนักโภชนาการ นักกายภาพบำบัด และผู้เชี่ยวชาญด้านการนอน \
         ที่เชี่ยวชาญด้านการวางแผนสุขภาพองค์รวมสำหรับผู้สูงอายุในประเทศไทย\n\n",
    );
    prompt.push_str(
        "โปรดสร้าง **แผนสุขภาพแบบองค์รวม 7 วัน** (วันจันทร์ถึงวันอาทิตย์) \
         โดยพิจารณาจากข้อมูลของผู้ใช้ดังต่อไปนี้:\n",
    );
    prompt.push_str(&format!("- อายุ: {} ปี\n", profile.age));
    prompt.push_str(&format!("- น้ำหนัก: {} กก.\n", profile.weight_kg));
    prompt.push_str(&format!("- ส่วนสูง: {} ซม.\n", profile.height_cm));
    prompt.push_str(&format!("- ดัชนีมวลกาย (BMI): {bmi}\n"));
    prompt.push_str(&format!("- โรคประจำตัว: {}\n", or_none(&profile.diseases)));
    prompt.push_str(&format!("- กิจกรรมการออกกำลังกายที่สนใจ: {interests}\n"));
    if !profile.custom_exercise.trim().is_empty() {
        prompt.push_str(&format!(
            "- กิจกรรมอื่นๆ ที่ผู้ใช้ระบุเอง: {}\n",
            profile.custom_exercise
        ));
    }
    let budget = if profile.budget.trim().is_empty() {
        "ไม่จำกัด"
    } else {
        profile.budget.as_str()
    };
    prompt.push_str(&format!("- งบประมาณอาหารต่อสัปดาห์: {budget} บาท\n"));
    prompt.push_str(&medication_info);
    prompt.push('\n');
    if !profile.favorite_foods.trim().is_empty() {
        prompt.push_str(&format!(
            "- เมนูโปรดของผู้ใช้ (พยายามแทรกในแผนถ้าเหมาะสม): {}\n",
            profile.favorite_foods
        ));
    }

    prompt.push_str(
        "\nคำแนะนำในการสร้างแผน:\n\
         1. **แผนอาหาร**: ออกแบบเมนูที่เหมาะสมกับวัย ภาวะสุขภาพ และยาที่ผู้ใช้ทาน \
         เสนอเมนู 2-3 อย่างต่อมื้อ พร้อมแคลอรี่และราคาโดยประมาณทุกเมนู \
         ประเมินค่าใช้จ่ายรายมื้อ รายวัน และรายสัปดาห์ให้ใกล้เคียงงบประมาณ \
         ใช้วัตถุดิบที่หาซื้อง่ายในประเทศไทย และเขียนคำอธิบายรายวัน (rationale) 2-3 ประโยค \
         ว่าทำไมชุดอาหารตามตัวเลือกแรกจึงดีต่อสุขภาพของผู้ใช้\n\
         2. **แผนการออกกำลังกาย**: ยึดตามกิจกรรมที่ผู้ใช้เลือกเท่านั้น \
         เสนอ 3-5 รูปแบบต่อวัน แต่ละรูปแบบระบุเป้าหมาย (target) และแคลอรี่ที่เผาผลาญ (caloriesBurned) \
         และกำหนดวันพักผ่อนอย่างน้อย 1-2 วัน\n\
         3. **การนอนหลับ**: แนะนำจำนวนชั่วโมงและช่วงเวลาที่เหมาะกับวัย\n\
         4. **ภาพรวม**: เขียนบทสรุปสั้นๆ ว่าทำไมแผนนี้ดีต่อสุขภาพของผู้ใช้ เนื้อหาทั้งหมดเป็นภาษาไทย\n\n\
         โปรดสร้างผลลัพธ์ตามโครงสร้าง JSON ที่กำหนดอย่างเคร่งครัด\n",
    );
    prompt
}

/// Prompt asking for a short nutritional rationale of a day's selection.
pub fn day_narrative(day: Day, meals: &DayMeals, profile: &HealthProfile) -> String {
    let medications: Vec<&str> = profile
        .active_medications()
        .iter()
        .map(|m| m.name.as_str())
        .collect();
    let medications = if medications.is_empty() {
        "ไม่มี".to_string()
    } else {
        medications.join(", ")
    };

    let mut prompt = format!(
        "ผู้ใช้รายนี้มีข้อมูลสุขภาพดังนี้:\n- อายุ: {} ปี\n- โรคประจำตัว: {}\n- ยาที่ใช้: {}\n\n\
         สำหรับ **{}** ผู้ใช้ได้เลือกเมนูอาหารดังนี้:\n",
        profile.age,
        or_none(&profile.diseases),
        medications,
        day.label(),
    );
    for (slot, meal) in meals.iter() {
        match meal {
            Some(meal) => prompt.push_str(&format!(
                "- {}: {} (ราคา {})\n",
                slot.label(),
                meal.name,
                if meal.cost.is_empty() { "N/A" } else { meal.cost.as_str() }
            )),
            None => prompt.push_str(&format!("- {}: ไม่ได้เลือก (ราคา N/A)\n", slot.label())),
        }
    }
    prompt.push_str(
        "\nจากข้อมูลข้างต้น โปรดวิเคราะห์และให้ **คำอธิบายทางโภชนาการสั้นๆ (2-3 ประโยค)** \
         ว่าชุดอาหารที่ผู้ใช้เลือกในวันนี้เหมาะสมกับสุขภาพของเขาอย่างไร และให้สารอาหารที่สำคัญอะไรบ้าง \
         ตอบเป็น JSON ในรูปแบบ {\"rationale\": \"...\"}\n",
    );
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        fixtures::{sample_plan, sample_profile},
        models::HealthProfile,
        selection::{Selection, SelectionResolver},
    };

    #[test]
    fn test_system_instruction_lists_capabilities() {
        assert!(SYSTEM_INSTRUCTION.contains("คุณสามารถอธิบายส่วนต่างๆ ของแผน"));
        assert!(SYSTEM_INSTRUCTION.contains("แนะนำการปรับเปลี่ยนสูตรง่ายๆ หากถูกถาม"));
        assert!(SYSTEM_INSTRUCTION.contains("\"responseText\""));
    }

    #[test]
    fn test_plan_generation_mentions_profile() {
        let prompt = plan_generation(&sample_profile());
        assert!(prompt.contains("อายุ: 68 ปี"));
        assert!(prompt.contains("BMI): 25.00"));
        assert!(prompt.contains("Amlodipine (ขนาด 5 mg, เวลา เช้า)"));
        assert!(prompt.contains("เดิน, ปั่นจักรยาน"));
        assert!(prompt.contains("ไม่จำกัด"));
    }

    #[test]
    fn test_plan_generation_without_medication() {
        let profile = HealthProfile {
            takes_medication: false,
            ..sample_profile()
        };
        assert!(plan_generation(&profile).contains("ยาที่ใช้ประจำ: ไม่มี"));
    }

    #[test]
    fn test_day_narrative_lists_selected_meals() {
        let plan = sample_plan();
        let selection = Selection::defaults();
        let resolver = SelectionResolver::new(&plan, &selection);
        let meals = DayMeals::from(resolver.selected_meals(Day::Tuesday));
        let prompt = day_narrative(Day::Tuesday, &meals, &sample_profile());

        assert!(prompt.contains("วันอังคาร"));
        assert!(prompt.contains("มื้อเช้า: โจ๊กหมู (ราคา 40-50 บาท)"));
        assert!(prompt.contains("ยาที่ใช้: Amlodipine"));
    }

    #[test]
    fn test_context_message_embeds_plan_json() {
        let message = context_message(&sample_profile(), &sample_plan()).unwrap();
        assert!(message.contains("\"weeklyPlan\""));
        assert!(message.contains("\"heightCm\""));
    }
}
